use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use ridepool_core::input::{non_blank, price_amount, seat_count};
use ridepool_core::{Trip, TripFilter, TripInput};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{error::AppError, middleware::AuthenticatedUser, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Numeric fields stay raw JSON so `"3"`, `3` and garbage can all be handled leniently.
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub driver: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub datetime: Option<String>,
    pub seats: Option<Value>,
    pub price: Option<Value>,
    pub car: Option<String>,
    pub plate: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TripCreatedResponse {
    pub message: &'static str,
    pub trip: Trip,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trips", get(list_trips).post(create_trip))
        .route("/api/trips/{id}", delete(delete_trip))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/trips
async fn list_trips(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<TripFilter>, AppError>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let trips = state.trips.list_trips().await?;
    Ok(Json(filter.apply(trips)))
}

/// POST /api/trips
async fn create_trip(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<CreateTripRequest>, AppError>,
) -> Result<Json<TripCreatedResponse>, AppError> {
    caller.require(caller.role().can_publish_trips(), "Only drivers can publish trips")?;

    let driver = match non_blank(req.driver) {
        Some(driver) if driver != caller.username() => {
            return Err(AppError::AuthorizationError(
                "Trips can only be published under your own account".to_string(),
            ));
        }
        _ => caller.username().to_string(),
    };

    let input = TripInput {
        driver: Some(driver),
        from: req.from,
        to: req.to,
        datetime: req.datetime,
        seats: seat_count(req.seats.as_ref())?,
        price: price_amount(req.price.as_ref())?,
        car: req.car,
        plate: req.plate,
    };
    let draft = input.resolve(&state.trip_defaults)?;
    let trip = state.trips.create_trip(draft).await?;

    Ok(Json(TripCreatedResponse {
        message: "Trip created",
        trip,
    }))
}

/// DELETE /api/trips/:id
/// Allowed for the trip's driver and for admins. Reservations of the trip are kept.
async fn delete_trip(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let trip = state
        .trips
        .find_trip(&id)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Trip not found".to_string()))?;

    caller.require(
        caller.role().is_admin() || trip.driver == caller.username(),
        "Only the trip's driver or an admin can delete it",
    )?;

    state.trips.delete_trip(&id).await?;
    Ok(Json(json!({ "message": "Trip deleted" })))
}
