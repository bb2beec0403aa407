use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use ridepool_core::{Role, UserProfile};
use ridepool_store::app_config::AuthConfig;
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Session Token
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue_session_token(auth: &AuthConfig, user: &UserProfile) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = i64::try_from(auth.jwt_expiration_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Session lifetime of {}s is out of range",
                auth.jwt_expiration_seconds
            ))
        })?;
    let claims = SessionClaims {
        sub: user.username.clone(),
        role: user.role,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

pub fn decode_session_token(auth: &AuthConfig, token: &str) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        AppError::AuthenticationError("Invalid or expired session token".to_string())
    })
}

// ============================================================================
// Authenticated Caller
// ============================================================================

/// The caller behind a valid `Authorization: Bearer` session token.
///
/// The account is looked up on every request; its stored role wins over the role in the
/// token, and deleted accounts lose access immediately.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub profile: UserProfile,
}

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.profile.username
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn require(&self, allowed: bool, message: &str) -> Result<(), AppError> {
        if allowed {
            Ok(())
        } else {
            Err(AppError::AuthorizationError(message.to_string()))
        }
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::AuthenticationError("Missing session token".to_string()))?;

        let claims = decode_session_token(&state.auth, bearer.token())?;

        let user = state
            .users
            .find_user(&claims.sub)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("Account no longer exists".to_string()))?;

        Ok(Self {
            profile: user.profile(),
        })
    }
}
