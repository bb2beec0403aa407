use axum::{
    body::Body,
    http::{header, Method, Request},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod reservations;
pub mod state;
pub mod trips;
pub mod users;

pub use error::AppError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            request_id = %Uuid::new_v4(),
            method = %req.method(),
            uri = %req.uri(),
        )
    });

    Router::new()
        .merge(auth::routes())
        .merge(users::routes())
        .merge(trips::routes())
        .merge(reservations::routes())
        .route("/metrics", get(metrics::metrics_handler))
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(state.clone(), middleware::track_metrics))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFoundError("Not found".to_string())
}
