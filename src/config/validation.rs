//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (lengths, attempts, Argon2 costs)
//! - Check that named roles and addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::access::Role;
use crate::config::schema::PortalConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }

    if config.credentials.path.trim().is_empty() {
        errors.push(ValidationError::new("credentials.path", "must not be empty"));
    }

    if config.credentials.default_role.parse::<Role>().is_err() {
        errors.push(ValidationError::new(
            "credentials.default_role",
            format!("unknown role: {}", config.credentials.default_role),
        ));
    }

    let policy = &config.password_policy;
    if policy.min_length == 0 {
        errors.push(ValidationError::new("password_policy.min_length", "must be > 0"));
    }
    if policy.min_length > policy.max_length {
        errors.push(ValidationError::new(
            "password_policy.max_length",
            format!("{} is below min_length {}", policy.max_length, policy.min_length),
        ));
    }
    if policy.special_chars.is_empty() {
        errors.push(ValidationError::new("password_policy.special_chars", "must not be empty"));
    }
    if policy.special_chars.chars().any(|c| c.is_alphanumeric()) {
        errors.push(ValidationError::new(
            "password_policy.special_chars",
            "must not contain letters or digits",
        ));
    }

    let hashing = &config.hashing;
    if let Err(e) = argon2::Params::new(hashing.memory_kib, hashing.iterations, hashing.parallelism, None) {
        errors.push(ValidationError::new("hashing", format!("rejected by argon2: {}", e)));
    }

    if config.lockout.max_attempts == 0 {
        errors.push(ValidationError::new("lockout.max_attempts", "must be > 0"));
    }
    if config.lockout.prune_interval_secs == 0 {
        errors.push(ValidationError::new("lockout.prune_interval_secs", "must be > 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    let obs = &config.observability;
    if obs.log_format != "pretty" && obs.log_format != "json" {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected \"pretty\" or \"json\", got {:?}", obs.log_format),
        ));
    }
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("not a socket address: {}", obs.metrics_address),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(validate_config(&PortalConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = PortalConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.credentials.default_role = "superuser".into();
        config.password_policy.min_length = 30;
        config.hashing.memory_kib = 1;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"credentials.default_role"));
        assert!(fields.contains(&"password_policy.max_length"));
        assert!(fields.contains(&"hashing"));
    }

    #[test]
    fn test_alphanumeric_special_chars_rejected() {
        let mut config = PortalConfig::default();
        config.password_policy.special_chars = "!a".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "password_policy.special_chars");
    }
}
