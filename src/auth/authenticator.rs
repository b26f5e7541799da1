//! Login verification and new-user registration.

use std::sync::Arc;

use crate::access::Role;
use crate::auth::hashing::CredentialHasher;
use crate::auth::password::PasswordPolicy;
use crate::error::PortalError;
use crate::observability::metrics;
use crate::store::{validate_username, CredentialStore, EmployeeRecord};

/// Verifies credentials against the store and registers new employees.
pub struct Authenticator {
    store: Arc<CredentialStore>,
    hasher: CredentialHasher,
    policy: PasswordPolicy,
    /// Verified against when the username is unknown, so both paths cost one hash.
    /// Uses the cost of a hash already on file; a store mixing cost parameters
    /// only matches one of them.
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(
        store: Arc<CredentialStore>,
        hasher: CredentialHasher,
        policy: PasswordPolicy,
    ) -> Result<Self, PortalError> {
        let dummy_hasher = store
            .any_hash()
            .and_then(|stored| CredentialHasher::with_params_of(&stored))
            .unwrap_or_else(|| hasher.clone());
        let dummy_hash = dummy_hasher.hash("employee-portal-dummy-password")?;
        Ok(Self {
            store,
            hasher,
            policy,
            dummy_hash,
        })
    }

    /// Recompute and compare. See [`CredentialHasher::authenticate`].
    pub fn authenticate(&self, stored_hash: &str, presented: &str) -> bool {
        self.hasher.authenticate(stored_hash, presented)
    }

    /// True if `username` exists and `password` matches its stored hash.
    ///
    /// Unknown usernames fail closed after the same amount of hashing work.
    pub fn login(&self, username: &str, password: &str) -> bool {
        match self.store.get_hash(username) {
            Ok(stored) => self.authenticate(&stored, password),
            Err(_) => {
                let _ = self.authenticate(&self.dummy_hash, password);
                false
            }
        }
    }

    /// Create a new employee with `role`.
    ///
    /// Checks run in order: username syntax, availability, password policy.
    /// The hash is only computed once every check has passed.
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<(), PortalError> {
        let result = self.try_register(username, password, role);
        metrics::record_registration(match &result {
            Ok(()) => "created",
            Err(PortalError::AlreadyExists(_)) => "username_taken",
            Err(PortalError::PolicyViolation) => "weak_password",
            Err(PortalError::InvalidUsername(_)) => "invalid_username",
            Err(_) => "error",
        });
        result
    }

    fn try_register(&self, username: &str, password: &str, role: Role) -> Result<(), PortalError> {
        validate_username(username)?;

        if self.store.exists(username) {
            return Err(PortalError::AlreadyExists(username.to_string()));
        }

        if !self.policy.validate(password) {
            tracing::debug!(
                username = %username,
                violations = ?self.policy.violations(password).iter().map(ToString::to_string).collect::<Vec<_>>(),
                "Password rejected by policy"
            );
            return Err(PortalError::PolicyViolation);
        }

        let password_hash = self.hasher.hash(password)?;
        self.store.insert(EmployeeRecord::new(username, password_hash, role))
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }
}
