use serde::Deserialize;

use crate::trip::Trip;

/// Query filters for browsing trips. Every present filter must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripFilter {
    /// Case-insensitive substring of the origin.
    pub from: Option<String>,
    /// Case-insensitive substring of the destination.
    pub to: Option<String>,
    /// Minimum remaining seats.
    pub seats: Option<u32>,
    /// Prefix of `datetime`, usually a `YYYY-MM-DD` date.
    pub date: Option<String>,
    /// Exact driver username.
    pub driver: Option<String>,
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

impl TripFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        let from_ok = needle(&self.from).map_or(true, |f| trip.from.to_lowercase().contains(&f));
        let to_ok = needle(&self.to).map_or(true, |t| trip.to.to_lowercase().contains(&t));
        let seats_ok = self.seats.map_or(true, |min| trip.seats >= min);
        let date_ok = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map_or(true, |d| trip.datetime.starts_with(d));
        let driver_ok = self.driver.as_deref().map_or(true, |d| trip.driver == d);

        from_ok && to_ok && seats_ok && date_ok && driver_ok
    }

    pub fn apply(&self, trips: Vec<Trip>) -> Vec<Trip> {
        trips.into_iter().filter(|t| self.matches(t)).collect()
    }
}
