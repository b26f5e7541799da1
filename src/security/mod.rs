//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (X-Frame-Options, nosniff, no-store, no-referrer)
//! ```
//!
//! Request-side limits (body size, timeout) are applied in `http::server`.

pub mod headers;
