use ridepool_core::TripDefaults;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_trips_file")]
    pub trips_file: String,
    #[serde(default = "default_reservations_file")]
    pub reservations_file: String,
    #[serde(default)]
    pub seed_demo_data: bool,
}

fn default_users_file() -> String { "users.json".to_string() }
fn default_trips_file() -> String { "trips.json".to_string() }
fn default_reservations_file() -> String { "reservations.json".to_string() }

impl StorageConfig {
    /// Storage rooted at `data_dir` with the default file names.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            users_file: default_users_file(),
            trips_file: default_trips_file(),
            reservations_file: default_reservations_file(),
            seed_demo_data: false,
        }
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn trips_path(&self) -> PathBuf {
        self.data_dir.join(&self.trips_file)
    }

    pub fn reservations_path(&self) -> PathBuf {
        self.data_dir.join(&self.reservations_file)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 { 10 }

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_seats")]
    pub default_seats: u32,
    #[serde(default)]
    pub default_price: f64,
    #[serde(default = "default_car")]
    pub default_car: String,
    #[serde(default = "default_plate")]
    pub default_plate: String,
}

fn default_seats() -> u32 { 1 }
fn default_car() -> String { "Car".to_string() }
fn default_plate() -> String { "---".to_string() }

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            default_seats: default_seats(),
            default_price: 0.0,
            default_car: default_car(),
            default_plate: default_plate(),
        }
    }
}

impl BusinessRules {
    pub fn trip_defaults(&self) -> TripDefaults {
        TripDefaults {
            seats: self.default_seats,
            price: self.default_price,
            car: self.default_car.clone(),
            plate: self.default_plate.clone(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Machine-local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `RIDEPOOL__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("RIDEPOOL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
