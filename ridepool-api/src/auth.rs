use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use ridepool_core::input::non_blank;
use ridepool_core::{Role, User, UserProfile};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::issue_session_token, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: UserProfile,
    pub token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

/// POST /api/register
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<Json<SessionResponse>, AppError> {
    let (Some(username), Some(password), Some(role)) = (
        non_blank(req.username),
        req.password.filter(|p| !p.is_empty()),
        non_blank(req.role),
    ) else {
        return Err(AppError::ValidationError("Missing fields".to_string()));
    };

    let role: Role = role.parse()?;
    if !role.can_self_register() {
        return Err(AppError::AuthorizationError(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    let hasher = state.hasher;
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))??;

    let user = state
        .users
        .create_user(User::new(username, hash.into_inner(), role))
        .await?;

    let profile = user.profile();
    let token = issue_session_token(&state.auth, &profile)?;
    Ok(Json(SessionResponse {
        message: "User registered",
        user: profile,
        token,
    }))
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<SessionResponse>, AppError> {
    let invalid = || AppError::AuthenticationError("Invalid credentials".to_string());

    let (Some(username), Some(password)) = (non_blank(req.username), req.password) else {
        return Err(invalid());
    };

    let user = state.users.find_user(&username).await?.ok_or_else(invalid)?;

    let hasher = state.hasher;
    let stored = user.password.clone();
    let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Verification task failed: {}", e)))??;
    if !verified {
        tracing::info!(username = %username, "Login rejected");
        return Err(invalid());
    }

    let profile = user.profile();
    let token = issue_session_token(&state.auth, &profile)?;
    Ok(Json(SessionResponse {
        message: "Login ok",
        user: profile,
        token,
    }))
}
