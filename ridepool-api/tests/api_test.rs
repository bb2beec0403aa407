use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use ridepool_api::{app, AppState};
use ridepool_core::identity::PasswordHasher;
use ridepool_store::app_config::{AuthConfig, BusinessRules, StorageConfig};
use ridepool_store::FileStore;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    dir: TempDir,
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut storage = StorageConfig::in_dir(dir.path());
    storage.seed_demo_data = true;

    let auth = AuthConfig {
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_seconds: 3600,
        bcrypt_cost: 4,
    };
    let hasher = PasswordHasher::new(auth.bcrypt_cost);
    let store = FileStore::open(&storage, &hasher).await.expect("open store");
    let state = AppState::new(Arc::new(store), auth, &BusinessRules::default()).expect("state");

    TestApp {
        router: app(state),
        dir,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().expect("token").to_string()
    }

    async fn create_trip(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/trips", Some(token), Some(body)).await
    }
}

fn trip_body(seats: Value) -> Value {
    json!({
        "from": "Abdali",
        "to": "Irbid",
        "datetime": "2025-09-01T07:00",
        "seats": seats,
        "price": "5"
    })
}

#[tokio::test]
async fn test_register_and_duplicate_username() {
    let app = setup().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "sara", "password": "pw", "role": "driver" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered");
    assert_eq!(body["user"], json!({ "username": "sara", "role": "driver" }));
    assert!(body["token"].is_string());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "sara", "password": "other", "role": "passenger" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");

    let (_, users) = app.send(Method::GET, "/api/users", None, None).await;
    let sara = users
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["username"] == "sara")
        .cloned()
        .unwrap();
    assert_eq!(sara["role"], "driver");
}

#[tokio::test]
async fn test_register_validation() {
    let app = setup().await;

    let (status, body) = app
        .send(Method::POST, "/api/register", None, Some(json!({ "username": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "x", "password": "pw", "role": "pilot" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "root", "password": "pw", "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = setup().await;
    app.login("user1", "pass").await;

    for creds in [
        json!({ "username": "user1", "password": "wrong" }),
        json!({ "username": "nobody", "password": "pass" }),
        json!({ "username": "user1" }),
    ] {
        let (status, body) = app.send(Method::POST, "/api/login", None, Some(creds)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_passwords_never_leave_the_server() {
    let app = setup().await;

    let (_, users) = app.send(Method::GET, "/api/users", None, None).await;
    assert_eq!(users.as_array().unwrap().len(), 3);
    assert!(users.as_array().unwrap().iter().all(|u| u.get("password").is_none()));

    let (_, login) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": "admin", "password": "admin" })),
        )
        .await;
    assert!(login["user"].get("password").is_none());

    let raw = std::fs::read_to_string(app.dir.path().join("users.json")).unwrap();
    let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
    assert!(stored.iter().all(|u| u["password"].as_str().unwrap().starts_with("$2")));
}

#[tokio::test]
async fn test_trip_creation_requires_driver() {
    let app = setup().await;

    let (status, _) = app
        .send(Method::POST, "/api/trips", None, Some(trip_body(json!(2))))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/api/trips", Some("not-a-token"), Some(trip_body(json!(2))))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let passenger = app.login("user1", "pass").await;
    let (status, _) = app.create_trip(&passenger, trip_body(json!(2))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let driver = app.login("driver1", "pass").await;
    let (status, body) = app.create_trip(&driver, trip_body(json!("3"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trip created");
    assert_eq!(body["trip"]["driver"], "driver1");
    assert_eq!(body["trip"]["seats"], 3);
    assert_eq!(body["trip"]["price"], 5.0);
    assert_eq!(body["trip"]["car"], "Car");
    assert_eq!(body["trip"]["plate"], "---");
    assert!(body["trip"]["id"].as_str().unwrap().starts_with("t_"));
}

#[tokio::test]
async fn test_trip_creation_validation() {
    let app = setup().await;
    let driver = app.login("driver1", "pass").await;

    let (status, body) = app
        .create_trip(&driver, json!({ "from": "Abdali", "datetime": "2025-09-01T07:00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields");

    let (status, _) = app.create_trip(&driver, trip_body(json!(-1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.create_trip(&driver, trip_body(json!("lots"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trip"]["seats"], 1);

    let mut other_driver = trip_body(json!(2));
    other_driver["driver"] = json!("someone_else");
    let (status, _) = app.create_trip(&driver, other_driver).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_trip_filters() {
    let app = setup().await;

    let (status, all) = app.send(Method::GET, "/api/trips", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, zarqa) = app.send(Method::GET, "/api/trips?to=zarq", None, None).await;
    assert_eq!(zarqa.as_array().unwrap().len(), 1);
    assert_eq!(zarqa[0]["from"], "Shmeisani");

    let (_, big) = app.send(Method::GET, "/api/trips?seats=4", None, None).await;
    assert_eq!(big.as_array().unwrap().len(), 1);
    assert_eq!(big[0]["to"], "Queen Alia Airport");

    let (_, by_date) = app
        .send(Method::GET, "/api/trips?date=2025-08-15&driver=driver1", None, None)
        .await;
    assert_eq!(by_date.as_array().unwrap().len(), 2);

    let (_, none) = app.send(Method::GET, "/api/trips?date=2030-01-01", None, None).await;
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reserve_until_sold_out() {
    let app = setup().await;
    let driver = app.login("driver1", "pass").await;
    let passenger = app.login("user1", "pass").await;

    let (_, created) = app.create_trip(&driver, trip_body(json!(2))).await;
    let trip_id = created["trip"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reserve",
            Some(&passenger),
            Some(json!({ "tripId": trip_id, "seats": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reserved");
    assert_eq!(body["trip"]["seats"], 0);
    assert_eq!(body["reservation"]["tripId"], trip_id.as_str());
    assert_eq!(body["reservation"]["passenger"], "user1");
    assert_eq!(body["reservation"]["seats"], 2);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reserve",
            Some(&passenger),
            Some(json!({ "tripId": trip_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Not enough seats");

    let (_, trips) = app.send(Method::GET, "/api/trips", None, None).await;
    let trip = trips
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == trip_id.as_str())
        .cloned()
        .unwrap();
    assert_eq!(trip["seats"], 0);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/reserve",
            Some(&driver),
            Some(json!({ "tripId": trip_id })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reserving_an_absurd_seat_count_is_sold_out() {
    let app = setup().await;
    let passenger = app.login("user1", "pass").await;

    let (_, trips) = app.send(Method::GET, "/api/trips", None, None).await;
    let trip_id = trips[0]["id"].as_str().unwrap().to_string();
    let seats_before = trips[0]["seats"].clone();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reserve",
            Some(&passenger),
            Some(json!({ "tripId": trip_id, "seats": 5_000_000_000u64 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Not enough seats");

    let (_, trips) = app.send(Method::GET, "/api/trips", None, None).await;
    assert_eq!(trips[0]["seats"], seats_before);
}

#[tokio::test]
async fn test_reserve_unknown_trip_and_missing_fields() {
    let app = setup().await;
    let passenger = app.login("user1", "pass").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/reserve",
            Some(&passenger),
            Some(json!({ "tripId": "t_missing" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trip not found");

    let (status, body) = app
        .send(Method::POST, "/api/reserve", Some(&passenger), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields");
}

#[tokio::test]
async fn test_reservations_are_scoped_by_role() {
    let app = setup().await;
    let driver = app.login("driver1", "pass").await;
    let passenger = app.login("user1", "pass").await;
    let admin = app.login("admin", "admin").await;

    let (_, trips) = app.send(Method::GET, "/api/trips", None, None).await;
    let trip_id = trips[0]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .send(
            Method::POST,
            "/api/reserve",
            Some(&passenger),
            Some(json!({ "tripId": trip_id, "seats": "1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, other) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "rami", "password": "pw", "role": "passenger" })),
        )
        .await;
    let other = other["token"].as_str().unwrap().to_string();

    let (status, _) = app.send(Method::GET, "/api/reservations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for (token, expected) in [(&passenger, 1), (&driver, 1), (&admin, 1), (&other, 0)] {
        let (status, list) = app.send(Method::GET, "/api/reservations", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), expected);
    }
}

#[tokio::test]
async fn test_trip_deletion() {
    let app = setup().await;
    let driver = app.login("driver1", "pass").await;
    let admin = app.login("admin", "admin").await;

    let (status, body) = app
        .send(Method::DELETE, "/api/trips/t_nothere", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trip not found");

    let (_, created) = app.create_trip(&driver, trip_body(json!(2))).await;
    let trip_id = created["trip"]["id"].as_str().unwrap().to_string();

    let (_, reg) = app
        .send(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": "driver2", "password": "pw", "role": "driver" })),
        )
        .await;
    let other_driver = reg["token"].as_str().unwrap().to_string();
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/trips/{}", trip_id), Some(&other_driver), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/trips/{}", trip_id), Some(&driver), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trip deleted");

    let (_, trips) = app.send(Method::GET, "/api/trips", None, None).await;
    assert!(trips.as_array().unwrap().iter().all(|t| t["id"] != trip_id.as_str()));
}

#[tokio::test]
async fn test_admin_deletes_user() {
    let app = setup().await;
    let admin = app.login("admin", "admin").await;
    let passenger = app.login("user1", "pass").await;

    let (status, _) = app
        .send(Method::DELETE, "/api/users/driver1", Some(&passenger), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::DELETE, "/api/users/ghost", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, body) = app
        .send(Method::DELETE, "/api/users/user1", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    // The deleted account's token no longer works.
    let (status, _) = app
        .send(Method::GET, "/api/reservations", Some(&passenger), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_metrics_and_unknown_routes() {
    let app = setup().await;
    app.send(Method::GET, "/api/trips", None, None).await;

    let (status, body) = app.send(Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = app.send(Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("ridepool_http_requests_total"));
}
