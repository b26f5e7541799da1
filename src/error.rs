//! Error taxonomy shared by the policy engine and the HTTP layer.

use thiserror::Error;

/// Errors produced by the credential store, authenticator and registration flow.
///
/// Variants carry just enough context for logs. The HTTP layer maps each one to a
/// fixed user-facing message, so nothing here leaks to a client verbatim.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Unknown username on lookup.
    #[error("user not found: {0}")]
    NotFound(String),

    /// Duplicate username on registration.
    #[error("username already exists: {0}")]
    AlreadyExists(String),

    /// Authentication failed. Never says whether the user exists.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Candidate password failed the complexity rules.
    #[error("password does not satisfy the complexity policy")]
    PolicyViolation,

    /// Username contains characters outside the allowed set or has a bad length.
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),

    /// Lockout threshold reached for this identity.
    #[error("too many failed attempts")]
    Locked,

    /// Credential source missing. Non-fatal; the store stays usable but empty.
    #[error("credential source unavailable: {0}")]
    SourceUnavailable(String),

    /// Hashing primitive failed (bad parameters, RNG failure).
    #[error("hashing error: {0}")]
    Hashing(String),

    /// Reading or writing the credential source failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A configured value the server cannot start with.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<std::io::Error> for PortalError {
    fn from(e: std::io::Error) -> Self {
        PortalError::Storage(e.to_string())
    }
}

impl From<csv::Error> for PortalError {
    fn from(e: csv::Error) -> Self {
        PortalError::Storage(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for PortalError {
    fn from(e: argon2::password_hash::Error) -> Self {
        PortalError::Hashing(e.to_string())
    }
}
