use chrono::{DateTime, Utc};

use crate::reservation::{Reservation, ReservationRequest};
use crate::trip::Trip;
use crate::CoreError;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SeatError {
    #[error("Trip not found")]
    TripNotFound(String),

    #[error("Not enough seats")]
    InsufficientSeats { requested: u32, available: u32 },

    #[error("Seat count must be at least 1")]
    NoSeatsRequested,
}

impl From<SeatError> for CoreError {
    fn from(err: SeatError) -> Self {
        match err {
            SeatError::TripNotFound(_) => CoreError::NotFound(err.to_string()),
            SeatError::InsufficientSeats { .. } => CoreError::Conflict(err.to_string()),
            SeatError::NoSeatsRequested => CoreError::ValidationError(err.to_string()),
        }
    }
}

impl Trip {
    /// Takes `quantity` seats, or fails leaving the trip untouched.
    pub fn take_seats(&mut self, quantity: u32) -> Result<(), SeatError> {
        if quantity == 0 {
            return Err(SeatError::NoSeatsRequested);
        }
        if self.seats < quantity {
            return Err(SeatError::InsufficientSeats {
                requested: quantity,
                available: self.seats,
            });
        }
        self.seats -= quantity;
        Ok(())
    }
}

/// Applies a reservation to an in-memory trip collection.
///
/// On success the matching trip has its seats decremented and the new reservation
/// plus a copy of the updated trip are returned. On failure `trips` is unchanged.
pub fn reserve(
    trips: &mut [Trip],
    request: &ReservationRequest,
    reservation_id: String,
    at: DateTime<Utc>,
) -> Result<(Reservation, Trip), SeatError> {
    let trip = trips
        .iter_mut()
        .find(|t| t.id == request.trip_id)
        .ok_or_else(|| SeatError::TripNotFound(request.trip_id.clone()))?;

    trip.take_seats(request.seats)?;

    let reservation = Reservation {
        id: reservation_id,
        trip_id: trip.id.clone(),
        passenger: request.passenger.clone(),
        seats: request.seats,
        timestamp: at,
    };
    Ok((reservation, trip.clone()))
}
