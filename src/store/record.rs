//! Employee records and username syntax.

use std::fmt;

use crate::access::Role;
use crate::error::PortalError;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// A single employee's credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub username: String,
    /// PHC-format Argon2 string (salt and parameters included).
    pub password_hash: String,
    pub role: Role,
}

impl EmployeeRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role,
        }
    }
}

// Keep hashes out of logs.
impl fmt::Debug for EmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmployeeRecord")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Usernames are 1..=32 ASCII letters, digits, `.`, `_` or `-`.
///
/// The restriction keeps usernames safe to embed in URL paths and CSV rows.
pub fn validate_username(username: &str) -> Result<(), PortalError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LENGTH
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(PortalError::InvalidUsername(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in ["alice", "j.smith", "dev_ops-2", "A"] {
            assert!(validate_username(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_usernames() {
        let too_long = "a".repeat(MAX_USERNAME_LENGTH + 1);
        for name in ["", "has space", "a/b", "comma,name", "émile", too_long.as_str()] {
            assert!(
                matches!(validate_username(name), Err(PortalError::InvalidUsername(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_debug_redacts_hash() {
        let record = EmployeeRecord::new("alice", "$argon2id$secret", Role::Admin);
        let debug = format!("{:?}", record);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }
}
