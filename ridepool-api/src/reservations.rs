use std::collections::HashSet;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use ridepool_core::input::{non_blank, seat_count};
use ridepool_core::{CoreError, Reservation, ReservationRequest, Role, Trip};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::AppError, middleware::AuthenticatedUser, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    pub trip_id: Option<String>,
    pub passenger: Option<String>,
    pub seats: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub message: &'static str,
    pub reservation: Reservation,
    pub trip: Trip,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reserve", post(reserve))
        .route("/api/reservations", get(list_reservations))
}

/// POST /api/reserve
async fn reserve(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<ReserveRequest>, AppError>,
) -> Result<Json<ReserveResponse>, AppError> {
    caller.require(caller.role().can_reserve(), "Only passengers can reserve seats")?;

    let Some(trip_id) = non_blank(req.trip_id) else {
        state.metrics.record_reservation("invalid");
        return Err(AppError::ValidationError("Missing fields".to_string()));
    };
    let passenger = match non_blank(req.passenger) {
        Some(passenger) if passenger != caller.username() => {
            return Err(AppError::AuthorizationError(
                "Seats can only be reserved for your own account".to_string(),
            ));
        }
        _ => caller.username().to_string(),
    };
    let seats = seat_count(req.seats.as_ref())
        .inspect_err(|_| state.metrics.record_reservation("invalid"))?
        .unwrap_or(1);

    let request = ReservationRequest {
        trip_id,
        passenger,
        seats,
    };
    let (reservation, trip) = match state.reservations.reserve(request).await {
        Ok(reserved) => {
            state.metrics.record_reservation("reserved");
            reserved
        }
        Err(e) => {
            let outcome = match &e {
                CoreError::NotFound(_) => "not_found",
                CoreError::Conflict(_) => "sold_out",
                CoreError::ValidationError(_) => "invalid",
                _ => "failed",
            };
            state.metrics.record_reservation(outcome);
            return Err(e.into());
        }
    };

    Ok(Json(ReserveResponse {
        message: "Reserved",
        reservation,
        trip,
    }))
}

/// GET /api/reservations
/// Admins see everything, passengers their own, drivers those on trips they drive.
async fn list_reservations(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let reservations = state.reservations.list_reservations().await?;

    let visible = match caller.role() {
        Role::Admin => reservations,
        Role::Passenger => reservations
            .into_iter()
            .filter(|r| r.passenger == caller.username())
            .collect(),
        Role::Driver => {
            let own_trips: HashSet<String> = state
                .trips
                .list_trips()
                .await?
                .into_iter()
                .filter(|t| t.driver == caller.username())
                .map(|t| t.id)
                .collect();
            reservations
                .into_iter()
                .filter(|r| own_trips.contains(&r.trip_id))
                .collect()
        }
    };

    Ok(Json(visible))
}
