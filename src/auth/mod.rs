//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Login:
//!     lockout guard (is the key locked?)
//!     → authenticator.rs (store lookup, Argon2 verify)
//!     → lockout guard (record outcome)
//!
//! Registration:
//!     username syntax → availability → password.rs (policy)
//!     → hashing.rs (Argon2id, random salt) → credential store insert
//! ```
//!
//! # Security Model
//! - Argon2id, PHC strings, per-password random salt
//! - Constant-time digest comparison (argon2 crate)
//! - Unknown usernames cost the same hashing work as wrong passwords
//! - Failures never say which half of the credentials was wrong

pub mod authenticator;
pub mod hashing;
pub mod password;

pub use authenticator::Authenticator;
pub use hashing::CredentialHasher;
pub use password::{PasswordPolicy, PolicyViolation};
