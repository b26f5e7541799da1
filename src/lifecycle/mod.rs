//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → Load credentials → Bind → Serve
//!
//! Shutdown:
//!     signals.rs (SIGTERM/SIGINT) → shutdown.rs trigger
//!     → server stops accepting, drains in-flight requests
//!     → lockout pruner exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
