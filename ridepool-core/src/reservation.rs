use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A passenger's claim on seats of one trip. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    #[serde(rename = "tripId")]
    pub trip_id: String,
    pub passenger: String,
    pub seats: u32,
    #[serde(alias = "time")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub trip_id: String,
    pub passenger: String,
    pub seats: u32,
}
