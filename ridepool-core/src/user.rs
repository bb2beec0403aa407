use std::fmt;
use std::str::FromStr;

use ridepool_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// What an account is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Admin,
    Driver,
    Passenger,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Driver => "driver",
            Role::Passenger => "passenger",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn can_publish_trips(self) -> bool {
        self == Role::Driver
    }

    pub fn can_reserve(self) -> bool {
        self == Role::Passenger
    }

    /// Admin accounts are provisioned, never self-registered.
    pub fn can_self_register(self) -> bool {
        self != Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "driver" => Ok(Role::Driver),
            "passenger" => Ok(Role::Passenger),
            other => Err(CoreError::ValidationError(format!("Invalid role: {}", other))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A stored account. `password` holds a bcrypt hash (or a legacy plaintext value).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: Masked<String>,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: String, role: Role) -> Self {
        Self {
            username: username.into(),
            password: Masked::new(password_hash),
            role,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// The public face of a user: everything except the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub role: Role,
}
