use std::sync::Arc;

use ridepool_core::identity::PasswordHasher;
use ridepool_core::repository::{ReservationRepository, TripRepository, UserRepository};
use ridepool_core::TripDefaults;
use ridepool_store::app_config::{AuthConfig, BusinessRules};
use ridepool_store::FileStore;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub hasher: PasswordHasher,
    pub auth: AuthConfig,
    pub trip_defaults: TripDefaults,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        store: Arc<FileStore>,
        auth: AuthConfig,
        business_rules: &BusinessRules,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            users: store.clone(),
            trips: store.clone(),
            reservations: store,
            hasher: PasswordHasher::new(auth.bcrypt_cost),
            auth,
            trip_defaults: business_rules.trip_defaults(),
            metrics: Arc::new(Metrics::new()?),
        })
    }
}
