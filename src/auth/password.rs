//! Password hashing and verification.
//!
//! bcrypt is CPU bound, so both directions run on the blocking thread pool
//! instead of the actix worker that is dispatching requests.

use crate::db::PasswordHash;
use crate::Result;

/// Work factor used for every stored password.
pub const PASSWORD_COST: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: PASSWORD_COST }
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with a different work factor. Only meant for test suites,
    /// where cost 4 keeps the runs fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plain: &str) -> Result<PasswordHash> {
        let plain = plain.to_owned();
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost)).await??;
        Ok(PasswordHash::from_digest(digest))
    }

    /// Returns `false` for a mismatch and for a malformed stored hash alike.
    pub async fn verify(&self, plain: &str, hash: &PasswordHash) -> bool {
        let plain = plain.to_owned();
        let digest = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plain, &digest).unwrap_or(false))
            .await
            .unwrap_or(false)
    }
}
