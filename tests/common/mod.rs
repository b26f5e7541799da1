//! Shared helpers for integration tests.

use std::sync::Arc;

use employee_portal::access::Role;
use employee_portal::auth::CredentialHasher;
use employee_portal::config::{HashingConfig, PortalConfig};
use employee_portal::store::{CredentialStore, EmployeeRecord};
use employee_portal::HttpServer;

pub const PASSWORD: &str = "Secret1!";

/// Config with the cheapest Argon2 parameters and terminal lockout.
pub fn test_config() -> PortalConfig {
    let mut config = PortalConfig::default();
    config.hashing = HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };
    config.credentials.persist = false;
    config.lockout.cooldown_secs = 0;
    config
}

/// In-memory store with one employee per role, all using `PASSWORD`.
pub fn seeded_store(config: &PortalConfig) -> Arc<CredentialStore> {
    let hasher = CredentialHasher::new(&config.hashing).unwrap();
    let store = CredentialStore::in_memory();
    for (name, role) in [
        ("alice", Role::Admin),
        ("bob", Role::Accountant),
        ("erin", Role::Engineer),
        ("ivan", Role::Intern),
    ] {
        store
            .insert(EmployeeRecord::new(name, hasher.hash(PASSWORD).unwrap(), role))
            .unwrap();
    }
    Arc::new(store)
}

pub fn test_server(config: PortalConfig) -> HttpServer {
    let store = seeded_store(&config);
    HttpServer::with_store(config, store).unwrap()
}
