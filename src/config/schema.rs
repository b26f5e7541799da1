//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the employee portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where employee credentials are loaded from and persisted to.
    pub credentials: CredentialsConfig,

    /// Password complexity rules for new accounts.
    pub password_policy: PasswordPolicyConfig,

    /// Argon2 cost parameters.
    pub hashing: HashingConfig,

    /// Failed-login lockout behavior.
    pub lockout: LockoutConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// HTTP hardening settings.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8097").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8097".to_string(),
        }
    }
}

/// Credential source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Path to the CSV file with header `username,passwordHash,role`.
    pub path: String,

    /// Append newly registered users to `path`.
    pub persist: bool,

    /// Role given to self-registered users.
    pub default_role: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: "data/employeeData.csv".to_string(),
            persist: true,
            default_role: "intern".to_string(),
        }
    }
}

/// Password complexity rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PasswordPolicyConfig {
    /// Minimum length in characters (inclusive).
    pub min_length: usize,

    /// Maximum length in characters (inclusive).
    pub max_length: usize,

    /// Characters that satisfy the special-character requirement.
    pub special_chars: String,
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 25,
            special_chars: "!@#$%^&*".to_string(),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,

    /// Number of passes.
    pub iterations: u32,

    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Which identity a failed-attempt counter is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockoutScope {
    /// One counter per submitted username.
    #[default]
    PerIdentity,
    /// One counter shared by every login attempt on the process.
    Global,
}

/// Lockout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LockoutConfig {
    /// Consecutive failures before a key is locked.
    pub max_attempts: u32,

    /// Counter scope.
    pub scope: LockoutScope,

    /// Seconds after the last failure before a locked key resets. 0 = never.
    pub cooldown_secs: u64,

    /// How often expired entries are pruned, in seconds.
    pub prune_interval_secs: u64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            scope: LockoutScope::PerIdentity,
            cooldown_secs: 900,
            prune_interval_secs: 60,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "employee_portal=info,tower_http=info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9097".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add X-Frame-Options, X-Content-Type-Options and Cache-Control headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 16 * 1024,
        }
    }
}
