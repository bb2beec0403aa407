pub mod auth;
pub mod metrics;

pub use auth::{issue_session_token, AuthenticatedUser, SessionClaims};
pub use metrics::track_metrics;
