//! Credential storage subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     employeeData.csv → credentials.rs (parse rows, skip bad ones)
//!     → DashMap<username, EmployeeRecord>
//!
//! Registration:
//!     validated username + Argon2 hash → insert (writer lock)
//!     → append CSV row → publish to map
//! ```
//!
//! # Design Decisions
//! - A missing or unreadable source never stops the process
//! - Reads are lock-free for callers; inserts are serialized
//! - Records are never mutated after insertion

pub mod credentials;
pub mod record;

pub use credentials::CredentialStore;
pub use record::{validate_username, EmployeeRecord, MAX_USERNAME_LENGTH};
