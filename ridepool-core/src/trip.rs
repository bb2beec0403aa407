use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::input::{lenient_number, non_blank, saturating_u32};
use crate::{CoreError, CoreResult};

/// A driver-offered ride. `seats` is the remaining capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub driver: String,
    pub from: String,
    pub to: String,
    pub datetime: String,
    #[serde(default, deserialize_with = "stored_seats")]
    pub seats: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub car: String,
    #[serde(default)]
    pub plate: String,
}

/// Older files may hold fractional, negative or string seat counts. Those are read
/// as the whole number of seats still bookable.
fn stored_seats<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(lenient_number(raw.as_ref()).map_or(0, |n| saturating_u32(n.floor())))
}

/// Values applied when a trip is submitted without them.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDefaults {
    pub seats: u32,
    pub price: f64,
    pub car: String,
    pub plate: String,
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self {
            seats: 1,
            price: 0.0,
            car: "Car".to_string(),
            plate: "---".to_string(),
        }
    }
}

/// Trip fields as submitted, numbers already parsed but nothing defaulted.
#[derive(Debug, Clone, Default)]
pub struct TripInput {
    pub driver: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub datetime: Option<String>,
    pub seats: Option<u32>,
    pub price: Option<f64>,
    pub car: Option<String>,
    pub plate: Option<String>,
}

impl TripInput {
    /// Checks required fields and fills in defaults.
    pub fn resolve(self, defaults: &TripDefaults) -> CoreResult<TripDraft> {
        let (Some(driver), Some(from), Some(to), Some(datetime)) = (
            non_blank(self.driver),
            non_blank(self.from),
            non_blank(self.to),
            non_blank(self.datetime),
        ) else {
            return Err(CoreError::ValidationError("Missing fields".to_string()));
        };

        Ok(TripDraft {
            driver,
            from,
            to,
            datetime,
            seats: self.seats.unwrap_or(defaults.seats),
            price: self.price.unwrap_or(defaults.price),
            car: non_blank(self.car).unwrap_or_else(|| defaults.car.clone()),
            plate: non_blank(self.plate).unwrap_or_else(|| defaults.plate.clone()),
        })
    }
}

/// A complete trip that only lacks its id; the store assigns one on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub driver: String,
    pub from: String,
    pub to: String,
    pub datetime: String,
    pub seats: u32,
    pub price: f64,
    pub car: String,
    pub plate: String,
}

impl TripDraft {
    pub fn into_trip(self, id: String) -> Trip {
        Trip {
            id,
            driver: self.driver,
            from: self.from,
            to: self.to,
            datetime: self.datetime,
            seats: self.seats,
            price: self.price,
            car: self.car,
            plate: self.plate,
        }
    }
}
