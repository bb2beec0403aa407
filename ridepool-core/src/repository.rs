use async_trait::async_trait;

use crate::reservation::{Reservation, ReservationRequest};
use crate::trip::{Trip, TripDraft};
use crate::user::User;
use crate::CoreResult;

/// Data access for accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> CoreResult<Vec<User>>;

    async fn find_user(&self, username: &str) -> CoreResult<Option<User>>;

    /// Fails with `Conflict` when the username is taken (exact, case-sensitive match).
    async fn create_user(&self, user: User) -> CoreResult<User>;

    /// Fails with `NotFound` when no such user exists.
    async fn delete_user(&self, username: &str) -> CoreResult<()>;
}

/// Data access for trips.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn list_trips(&self) -> CoreResult<Vec<Trip>>;

    async fn find_trip(&self, id: &str) -> CoreResult<Option<Trip>>;

    /// Assigns a fresh id and appends the trip.
    async fn create_trip(&self, draft: TripDraft) -> CoreResult<Trip>;

    /// Removes the trip and returns it. Fails with `NotFound` when absent.
    async fn delete_trip(&self, id: &str) -> CoreResult<Trip>;
}

/// Data access for reservations, including the seat bookkeeping on trips.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn list_reservations(&self) -> CoreResult<Vec<Reservation>>;

    /// Decrements the trip's seats and records the reservation as one step.
    /// Returns the reservation and the updated trip.
    async fn reserve(&self, request: ReservationRequest) -> CoreResult<(Reservation, Trip)>;
}
