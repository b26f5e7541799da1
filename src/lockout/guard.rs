//! Keyed failed-attempt counters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::{LockoutConfig, LockoutScope};
use crate::error::PortalError;
use crate::observability::metrics;

/// Key shared by every attempt in global scope.
const GLOBAL_KEY: &str = "*";

/// Lockout state of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    /// Accepting attempts; `failures` consecutive failures so far.
    Open { failures: u32 },
    /// Rejecting attempts.
    Locked,
}

#[derive(Debug)]
struct AttemptEntry {
    failures: u32,
    /// Attempts admitted by `guarded_attempt` whose verifier has not returned.
    in_flight: u32,
    last_failure: Instant,
}

impl AttemptEntry {
    fn new() -> Self {
        Self {
            failures: 0,
            in_flight: 0,
            last_failure: Instant::now(),
        }
    }

    fn idle(&self) -> bool {
        self.failures == 0 && self.in_flight == 0
    }
}

/// Tracks consecutive failed logins and blocks keys that reach the threshold.
pub struct LockoutGuard {
    entries: DashMap<String, AttemptEntry>,
    max_attempts: u32,
    scope: LockoutScope,
    cooldown: Option<Duration>,
}

/// An admitted attempt. Dropping it unsettled releases the slot.
struct Reservation<'a> {
    guard: &'a LockoutGuard,
    key: &'a str,
    settled: bool,
}

impl Reservation<'_> {
    fn settle(mut self, success: bool) -> LockoutState {
        self.settled = true;
        self.guard.update(self.key, Some(success), true)
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.guard.update(self.key, None, true);
        }
    }
}

impl LockoutGuard {
    pub fn new(max_attempts: u32, scope: LockoutScope, cooldown: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            scope,
            cooldown,
        }
    }

    pub fn from_config(config: &LockoutConfig) -> Self {
        let cooldown = (config.cooldown_secs > 0).then(|| Duration::from_secs(config.cooldown_secs));
        Self::new(config.max_attempts, config.scope, cooldown)
    }

    fn key<'a>(&self, username: &'a str) -> &'a str {
        match self.scope {
            LockoutScope::PerIdentity => username,
            LockoutScope::Global => GLOBAL_KEY,
        }
    }

    fn expired(&self, entry: &AttemptEntry) -> bool {
        self.cooldown
            .is_some_and(|cooldown| entry.last_failure.elapsed() >= cooldown)
    }

    fn entry_locked(&self, entry: &AttemptEntry) -> bool {
        entry.failures >= self.max_attempts && !self.expired(entry)
    }

    /// Current state for `username` (ignored in global scope).
    pub fn state(&self, username: &str) -> LockoutState {
        match self.entries.get(self.key(username)) {
            Some(entry) if self.entry_locked(&entry) => LockoutState::Locked,
            Some(entry) if !self.expired(&entry) => LockoutState::Open { failures: entry.failures },
            _ => LockoutState::Open { failures: 0 },
        }
    }

    pub fn is_locked(&self, username: &str) -> bool {
        self.state(username) == LockoutState::Locked
    }

    /// True only in global scope while the shared counter is locked.
    pub fn is_globally_locked(&self) -> bool {
        self.scope == LockoutScope::Global && self.is_locked(GLOBAL_KEY)
    }

    /// Record the outcome of an authentication attempt.
    ///
    /// Success resets an open counter. Failure increments it and locks the key
    /// when it reaches `max_attempts`. A locked key is left unchanged.
    pub fn record_attempt(&self, username: &str, success: bool) -> LockoutState {
        self.update(self.key(username), Some(success), false)
    }

    /// Apply an outcome to `key` under its shard lock.
    ///
    /// `outcome` is `None` when a reservation is released without a verdict.
    fn update(&self, key: &str, outcome: Option<bool>, release: bool) -> LockoutState {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(AttemptEntry::new);

        if release {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
        if self.expired(&entry) {
            entry.failures = 0;
        }

        let state = match outcome {
            _ if entry.failures >= self.max_attempts => LockoutState::Locked,
            None => LockoutState::Open { failures: entry.failures },
            Some(true) => {
                entry.failures = 0;
                LockoutState::Open { failures: 0 }
            }
            Some(false) => {
                entry.failures += 1;
                entry.last_failure = Instant::now();

                if entry.failures >= self.max_attempts {
                    tracing::warn!(
                        key = %key,
                        failures = entry.failures,
                        cooldown_secs = self.cooldown.map(|d| d.as_secs()),
                        "Lockout threshold reached"
                    );
                    metrics::record_lockout();
                    LockoutState::Locked
                } else {
                    LockoutState::Open { failures: entry.failures }
                }
            }
        };

        let idle = entry.idle();
        drop(entry);
        if idle {
            self.entries.remove_if(key, |_, entry| entry.idle());
        }
        state
    }

    /// Admit one attempt on `key` if the failures already recorded plus the
    /// attempts still verifying stay below `max_attempts`.
    fn reserve<'a>(&'a self, key: &'a str) -> Option<Reservation<'a>> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(AttemptEntry::new);

        if self.expired(&entry) {
            entry.failures = 0;
        }
        if entry.failures + entry.in_flight >= self.max_attempts {
            return None;
        }
        entry.in_flight += 1;

        Some(Reservation {
            guard: self,
            key,
            settled: false,
        })
    }

    /// Run `verify` unless the key is locked, then record its outcome.
    ///
    /// Returns `Locked` without calling `verify` when the key is locked or when
    /// the attempts already verifying could lock it. A success that lands after
    /// the key locked is also `Locked`. A failed attempt (including the one that
    /// trips the lock) is `InvalidCredentials`.
    pub fn guarded_attempt<F>(&self, username: &str, verify: F) -> Result<(), PortalError>
    where
        F: FnOnce() -> bool,
    {
        let Some(reservation) = self.reserve(self.key(username)) else {
            metrics::record_login("locked");
            return Err(PortalError::Locked);
        };

        let verified = verify();
        let state = reservation.settle(verified);

        match (verified, state) {
            (true, LockoutState::Locked) => {
                tracing::warn!(username = %username, "Correct password on a locked key rejected");
                metrics::record_login("locked");
                Err(PortalError::Locked)
            }
            (true, _) => {
                metrics::record_login("success");
                Ok(())
            }
            (false, state) => {
                tracing::info!(username = %username, state = ?state, "Login failed");
                metrics::record_login("failure");
                Err(PortalError::InvalidCredentials)
            }
        }
    }

    /// Drop entries whose cooldown has elapsed. Returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.in_flight > 0 || !self.expired(entry));
        before.saturating_sub(self.entries.len())
    }

    /// Number of keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    /// Periodically prune expired entries until shutdown.
    pub async fn run_pruner(self: Arc<Self>, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        if self.cooldown.is_none() {
            tracing::debug!("Lockout cooldown disabled, pruner not started");
            return;
        }

        let mut ticker = time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = self.prune_expired();
                    if removed > 0 {
                        tracing::debug!(removed, remaining = self.tracked(), "Pruned expired lockout entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Lockout pruner received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

impl Default for LockoutGuard {
    fn default() -> Self {
        Self::from_config(&LockoutConfig::default())
    }
}
