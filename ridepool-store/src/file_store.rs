use async_trait::async_trait;
use chrono::Utc;
use ridepool_core::booking;
use ridepool_core::identity::PasswordHasher;
use ridepool_core::repository::{ReservationRepository, TripRepository, UserRepository};
use ridepool_core::{
    CoreError, CoreResult, Reservation, ReservationRequest, Trip, TripDraft, User,
};
use ridepool_shared::RecordId;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::app_config::StorageConfig;
use crate::json_file::JsonFile;
use crate::seed;

/// Users, trips and reservations kept in three JSON array files.
///
/// Every mutation holds `write_lock` for its whole read-modify-write cycle, across all
/// three files. Reads skip the lock; atomic renames keep them consistent per file.
pub struct FileStore {
    users: JsonFile<User>,
    trips: JsonFile<Trip>,
    reservations: JsonFile<Reservation>,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store, creating the data directory and any missing collection files.
    /// Missing files get demo content when `seed_demo_data` is set, `[]` otherwise.
    pub async fn open(config: &StorageConfig, hasher: &PasswordHasher) -> CoreResult<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;

        let store = Self {
            users: JsonFile::new(config.users_path()),
            trips: JsonFile::new(config.trips_path()),
            reservations: JsonFile::new(config.reservations_path()),
            write_lock: Mutex::new(()),
        };

        if !store.users.exists().await? {
            let users = if config.seed_demo_data {
                seed::demo_users(hasher)?
            } else {
                Vec::new()
            };
            info!(path = %store.users.path().display(), count = users.len(), "Creating users collection");
            store.users.save(&users).await?;
        }
        if !store.trips.exists().await? {
            let trips = if config.seed_demo_data {
                seed::demo_trips()
            } else {
                Vec::new()
            };
            info!(path = %store.trips.path().display(), count = trips.len(), "Creating trips collection");
            store.trips.save(&trips).await?;
        }
        if !store.reservations.exists().await? {
            info!(path = %store.reservations.path().display(), "Creating reservations collection");
            store.reservations.save(&[]).await?;
        }

        Ok(store)
    }
}

#[async_trait]
impl UserRepository for FileStore {
    async fn list_users(&self) -> CoreResult<Vec<User>> {
        self.users.load().await
    }

    async fn find_user(&self, username: &str) -> CoreResult<Option<User>> {
        let users = self.users.load().await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn create_user(&self, user: User) -> CoreResult<User> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.users.load().await?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(CoreError::Conflict("User already exists".to_string()));
        }
        users.push(user.clone());
        self.users.save(&users).await?;

        info!(username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    async fn delete_user(&self, username: &str) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.users.load().await?;
        let before = users.len();
        users.retain(|u| u.username != username);
        if users.len() == before {
            return Err(CoreError::NotFound("User not found".to_string()));
        }
        self.users.save(&users).await?;

        info!(username, "User deleted");
        Ok(())
    }
}

#[async_trait]
impl TripRepository for FileStore {
    async fn list_trips(&self) -> CoreResult<Vec<Trip>> {
        self.trips.load().await
    }

    async fn find_trip(&self, id: &str) -> CoreResult<Option<Trip>> {
        let trips = self.trips.load().await?;
        Ok(trips.into_iter().find(|t| t.id == id))
    }

    async fn create_trip(&self, draft: TripDraft) -> CoreResult<Trip> {
        let _guard = self.write_lock.lock().await;

        let mut trips = self.trips.load().await?;
        let id = RecordId::Trip.generate_unique(|candidate| trips.iter().any(|t| t.id == candidate));
        let trip = draft.into_trip(id);
        trips.push(trip.clone());
        self.trips.save(&trips).await?;

        info!(trip_id = %trip.id, driver = %trip.driver, seats = trip.seats, "Trip created");
        Ok(trip)
    }

    async fn delete_trip(&self, id: &str) -> CoreResult<Trip> {
        let _guard = self.write_lock.lock().await;

        let mut trips = self.trips.load().await?;
        let idx = trips
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::NotFound("Trip not found".to_string()))?;
        let removed = trips.remove(idx);
        self.trips.save(&trips).await?;

        info!(trip_id = %removed.id, "Trip deleted");
        Ok(removed)
    }
}

#[async_trait]
impl ReservationRepository for FileStore {
    async fn list_reservations(&self) -> CoreResult<Vec<Reservation>> {
        self.reservations.load().await
    }

    async fn reserve(&self, request: ReservationRequest) -> CoreResult<(Reservation, Trip)> {
        let _guard = self.write_lock.lock().await;

        let mut trips = self.trips.load().await?;
        let mut reservations = self.reservations.load().await?;
        let previous_trips = trips.clone();

        let id = RecordId::Reservation
            .generate_unique(|candidate| reservations.iter().any(|r| r.id == candidate));
        let (reservation, trip) = booking::reserve(&mut trips, &request, id, Utc::now())
            .inspect_err(|e| warn!(trip_id = %request.trip_id, passenger = %request.passenger, "Reservation refused: {}", e))?;

        self.trips.save(&trips).await?;

        reservations.push(reservation.clone());
        if let Err(e) = self.reservations.save(&reservations).await {
            error!(trip_id = %trip.id, "Recording reservation failed, restoring trip seats: {}", e);
            if let Err(rollback) = self.trips.save(&previous_trips).await {
                error!(
                    trip_id = %trip.id,
                    seats_taken = reservation.seats,
                    "Trip seats could not be restored; trips and reservations have diverged: {}",
                    rollback
                );
            }
            return Err(e);
        }

        info!(
            reservation_id = %reservation.id,
            trip_id = %trip.id,
            passenger = %reservation.passenger,
            seats = reservation.seats,
            remaining = trip.seats,
            "Seats reserved"
        );
        Ok((reservation, trip))
    }
}
