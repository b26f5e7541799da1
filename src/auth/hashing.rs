//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$digest`), so
//! the salt and cost parameters travel with the digest and verification
//! recomputes with whatever parameters the stored hash was made with.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::HashingConfig;
use crate::error::PortalError;

/// Salted, memory-hard password hashing.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Build a hasher with the configured cost parameters.
    pub fn new(config: &HashingConfig) -> Result<Self, PortalError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| PortalError::Hashing(format!("invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Build a hasher with the cost parameters encoded in `stored_hash`.
    pub fn with_params_of(stored_hash: &str) -> Option<Self> {
        let parsed = PasswordHash::new(stored_hash).ok()?;
        let params = Params::try_from(&parsed).ok()?;
        Some(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, PortalError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Check `presented` against `stored_hash` in constant time.
    ///
    /// A stored hash that does not parse verifies as false.
    pub fn authenticate(&self, stored_hash: &str, presented: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                return false;
            }
        };

        self.argon2
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> CredentialHasher {
    // Minimum cost keeps the suite fast.
    CredentialHasher::new(&HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}
