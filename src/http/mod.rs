//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign x-request-id)
//!     → handlers.rs
//!         POST /            → lockout guard → authenticator
//!         POST /new_user    → authenticator::register
//!         GET  /menu/...    → store role → access policy
//!     → response.rs (pages, error → status mapping)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
