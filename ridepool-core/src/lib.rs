pub mod booking;
pub mod identity;
pub mod input;
pub mod repository;
pub mod reservation;
pub mod search;
pub mod trip;
pub mod user;

pub use reservation::{Reservation, ReservationRequest};
pub use search::TripFilter;
pub use trip::{Trip, TripDefaults, TripDraft, TripInput};
pub use user::{Role, User, UserProfile};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    IdentityError(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Storage failure: {0}")]
    StorageError(#[from] std::io::Error),
    #[error("Malformed record data: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
