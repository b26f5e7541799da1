//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portal_login_attempts_total` (counter): login outcomes by `outcome`
//! - `portal_lockouts_total` (counter): keys that entered the locked state
//! - `portal_registrations_total` (counter): new-user outcomes by `outcome`
//! - `portal_access_decisions_total` (counter): menu decisions by `role`, `allowed`
//! - `portal_credential_store_size` (gauge): number of loaded employees
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and start its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_login(outcome: &'static str) {
    counter!("portal_login_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_lockout() {
    counter!("portal_lockouts_total").increment(1);
}

pub fn record_registration(outcome: &'static str) {
    counter!("portal_registrations_total", "outcome" => outcome).increment(1);
}

pub fn record_access_decision(role: &'static str, allowed: bool) {
    counter!(
        "portal_access_decisions_total",
        "role" => role,
        "allowed" => if allowed { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_store_size(size: usize) {
    gauge!("portal_credential_store_size").set(size as f64);
}
