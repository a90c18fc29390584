//! In-memory login attempt ledger and lock tables
//!
//! Nothing here is persisted. All mutation goes through
//! [`LoginGuardStore::with_state`], which holds the mutex for the whole
//! closure so a check-then-lock sequence is atomic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// A single recorded login attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub username: String,
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

/// Attempt ledger plus lock expiry tables
#[derive(Debug, Default)]
pub struct GuardState {
    attempts: VecDeque<LoginAttempt>,
    locked_accounts: HashMap<String, DateTime<Utc>>,
    locked_addresses: HashMap<String, DateTime<Utc>>,
}

impl GuardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_attempt(&mut self, attempt: LoginAttempt) {
        self.attempts.push_back(attempt);
    }

    /// Failed attempts for `username` strictly after `since`
    pub fn failed_attempts_since(&self, username: &str, since: DateTime<Utc>) -> u32 {
        self.attempts
            .iter()
            .filter(|a| a.username == username && !a.success && a.timestamp > since)
            .count() as u32
    }

    /// Attempts of any outcome from `address` strictly after `since`
    pub fn address_attempts_since(&self, address: &str, since: DateTime<Utc>) -> u32 {
        self.attempts
            .iter()
            .filter(|a| a.address == address && a.timestamp > since)
            .count() as u32
    }

    /// Lock expiry for an account, if the lock is still active at `now`
    pub fn account_lock(&self, username: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_accounts.get(username).copied().filter(|until| *until > now)
    }

    /// Lock expiry for an address, if the lock is still active at `now`
    pub fn address_lock(&self, address: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.locked_addresses.get(address).copied().filter(|until| *until > now)
    }

    pub fn lock_account(&mut self, username: &str, until: DateTime<Utc>) {
        self.locked_accounts.insert(username.to_string(), until);
    }

    pub fn lock_address(&mut self, address: &str, until: DateTime<Utc>) {
        self.locked_addresses.insert(address.to_string(), until);
    }

    /// Returns true if a lock entry existed
    pub fn unlock_account(&mut self, username: &str) -> bool {
        self.locked_accounts.remove(username).is_some()
    }

    /// Returns true if a lock entry existed
    pub fn unlock_address(&mut self, address: &str) -> bool {
        self.locked_addresses.remove(address).is_some()
    }

    /// Drop attempts at or before `cutoff` and locks that expired by `now`
    pub fn prune(&mut self, cutoff: DateTime<Utc>, now: DateTime<Utc>) {
        // Replayed attempts are not necessarily in timestamp order
        self.attempts.retain(|a| a.timestamp > cutoff);
        self.locked_accounts.retain(|_, until| *until > now);
        self.locked_addresses.retain(|_, until| *until > now);
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    pub fn locked_account_count(&self, now: DateTime<Utc>) -> usize {
        self.locked_accounts.values().filter(|until| **until > now).count()
    }

    pub fn locked_address_count(&self, now: DateTime<Utc>) -> usize {
        self.locked_addresses.values().filter(|until| **until > now).count()
    }
}

/// Shareable, mutex-guarded [`GuardState`]
#[derive(Debug, Default)]
pub struct LoginGuardStore {
    state: Mutex<GuardState>,
}

impl LoginGuardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with exclusive access to the state
    ///
    /// A panic in another holder does not leave the tables unusable; the
    /// poisoned guard is recovered as-is.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut GuardState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}
