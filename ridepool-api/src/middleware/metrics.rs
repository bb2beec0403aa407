use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

pub async fn track_metrics(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    state
        .metrics
        .observe_request(&method, response.status().as_u16(), started.elapsed());
    response
}
