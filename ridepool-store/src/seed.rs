//! Demo content written into missing collection files on first start.

use ridepool_core::identity::PasswordHasher;
use ridepool_core::{CoreResult, Role, Trip, TripDraft, User};
use ridepool_shared::RecordId;

const DEMO_ACCOUNTS: [(&str, &str, Role); 3] = [
    ("admin", "admin", Role::Admin),
    ("driver1", "pass", Role::Driver),
    ("user1", "pass", Role::Passenger),
];

pub fn demo_users(hasher: &PasswordHasher) -> CoreResult<Vec<User>> {
    DEMO_ACCOUNTS
        .iter()
        .map(|(username, password, role)| {
            let hash = hasher.hash(password)?;
            Ok(User::new(*username, hash.into_inner(), *role))
        })
        .collect()
}

pub fn demo_trips() -> Vec<Trip> {
    let drafts = [
        TripDraft {
            driver: "driver1".to_string(),
            from: "Abdali".to_string(),
            to: "Queen Alia Airport".to_string(),
            datetime: "2025-08-15T08:30".to_string(),
            seats: 4,
            price: 15.0,
            car: "Toyota Camry".to_string(),
            plate: "AMM123".to_string(),
        },
        TripDraft {
            driver: "driver1".to_string(),
            from: "Shmeisani".to_string(),
            to: "Zarqa".to_string(),
            datetime: "2025-08-15T09:00".to_string(),
            seats: 3,
            price: 8.0,
            car: "Elantra".to_string(),
            plate: "AMM567".to_string(),
        },
    ];

    let mut trips: Vec<Trip> = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let id = RecordId::Trip.generate_unique(|candidate| trips.iter().any(|t| t.id == candidate));
        trips.push(draft.into_trip(id));
    }
    trips
}
