//! Employee portal library.
//!
//! Authentication and authorization for a small internal portal: credential
//! verification, password policy, failed-login lockout and role-based menu
//! access, served over HTTP.

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod lockout;
pub mod observability;
pub mod security;
pub mod store;

pub use config::schema::PortalConfig;
pub use error::PortalError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
