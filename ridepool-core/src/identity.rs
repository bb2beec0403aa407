use ridepool_shared::Masked;

use crate::{CoreError, CoreResult};

/// Hashes and verifies account passwords with bcrypt.
///
/// Both operations are CPU-bound; async callers should run them on a blocking thread.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> CoreResult<Masked<String>> {
        bcrypt::hash(plain, self.cost)
            .map(Masked::new)
            .map_err(|e| CoreError::InternalError(format!("Password hashing failed: {}", e)))
    }

    /// Checks `plain` against a stored credential.
    ///
    /// Records written before hashing was introduced hold the plaintext; those are
    /// compared directly.
    pub fn verify(&self, plain: &str, stored: &Masked<String>) -> CoreResult<bool> {
        let stored = stored.expose();
        if !is_bcrypt_hash(stored) {
            tracing::warn!("Verifying a legacy plaintext credential");
            return Ok(plain == stored);
        }
        bcrypt::verify(plain, stored)
            .map_err(|e| CoreError::InternalError(format!("Password verification failed: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| value.starts_with(prefix))
}
