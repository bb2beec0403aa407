use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use ridepool_core::UserProfile;
use serde_json::{json, Value};

use crate::{error::AppError, middleware::AuthenticatedUser, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{username}", delete(delete_user))
}

/// GET /api/users
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, AppError> {
    let users = state.users.list_users().await?;
    Ok(Json(users.iter().map(|u| u.profile()).collect()))
}

/// DELETE /api/users/:username
async fn delete_user(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(username): Path<String>,
) -> Result<Json<Value>, AppError> {
    caller.require(caller.role().is_admin(), "Only admins can delete users")?;

    state.users.delete_user(&username).await?;
    tracing::info!(username = %username, admin = %caller.username(), "User removed by admin");

    Ok(Json(json!({ "message": "User deleted" })))
}
