//! Login throttling and lockout decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LoginGuardConfig;
use crate::password::{check_password_strength, PasswordStrength};
use crate::store::{LoginAttempt, LoginGuardStore};

/// Why a login was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    AccountLocked,
    AddressLocked,
    AddressRateLimited,
    TooManyFailedAttempts,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::AccountLocked => "account locked",
            DenyReason::AddressLocked => "address locked",
            DenyReason::AddressRateLimited => "address rate limit exceeded",
            DenyReason::TooManyFailedAttempts => "too many failed attempts",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of [`LoginGuard::check_login_allowed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockout_remaining_seconds: Option<i64>,
}

impl LoginDecision {
    fn allow(remaining_attempts: u32) -> Self {
        Self {
            allowed: true,
            reason: None,
            remaining_attempts: Some(remaining_attempts),
            lockout_remaining_seconds: None,
        }
    }

    fn deny(reason: DenyReason, lockout_remaining_seconds: i64) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            remaining_attempts: None,
            lockout_remaining_seconds: Some(lockout_remaining_seconds),
        }
    }
}

/// Snapshot of guard state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardStats {
    pub tracked_attempts: usize,
    pub locked_accounts: usize,
    pub locked_addresses: usize,
}

/// Per-account and per-address login throttle
///
/// Advisory only: a process restart clears every lock.
pub struct LoginGuard {
    config: LoginGuardConfig,
    store: Arc<LoginGuardStore>,
    clock: Arc<dyn Clock>,
}

impl LoginGuard {
    pub fn new(config: LoginGuardConfig, store: Arc<LoginGuardStore>, clock: Arc<dyn Clock>) -> Self {
        Self { config, store, clock }
    }

    /// Default limits, a fresh store, and the system clock
    pub fn with_defaults() -> Self {
        Self::new(
            LoginGuardConfig::default(),
            Arc::new(LoginGuardStore::new()),
            Arc::new(SystemClock),
        )
    }

    pub fn config(&self) -> &LoginGuardConfig {
        &self.config
    }

    /// Decide whether a login may proceed to credential verification
    ///
    /// Checks run in order: account lock, address lock, address rate,
    /// failed-attempt count. The rate and count checks install a lock
    /// when they trip.
    pub fn check_login_allowed(&self, username: &str, address: &str) -> LoginDecision {
        let now = self.clock.now();
        let config = &self.config;
        let lockout = config.lockout();

        self.store.with_state(|state| {
            if let Some(until) = state.account_lock(username, now) {
                debug!(username, "Login denied: account locked");
                return LoginDecision::deny(DenyReason::AccountLocked, remaining_seconds(until, now));
            }

            if let Some(until) = state.address_lock(address, now) {
                debug!(address, "Login denied: address locked");
                return LoginDecision::deny(DenyReason::AddressLocked, remaining_seconds(until, now));
            }

            let from_address = state.address_attempts_since(address, now - config.ip_rate_window());
            if from_address >= config.ip_rate_limit {
                state.lock_address(address, now + lockout);
                warn!(
                    address,
                    attempts = from_address,
                    lockout_secs = lockout.num_seconds(),
                    "Address locked: rate limit exceeded"
                );
                return LoginDecision::deny(DenyReason::AddressRateLimited, lockout.num_seconds());
            }

            let failed = state.failed_attempts_since(username, now - config.window());
            if failed >= config.max_attempts {
                state.lock_account(username, now + lockout);
                warn!(
                    username,
                    failed,
                    lockout_secs = lockout.num_seconds(),
                    "Account locked: too many failed attempts"
                );
                let mut decision = LoginDecision::deny(DenyReason::TooManyFailedAttempts, lockout.num_seconds());
                decision.remaining_attempts = Some(0);
                return decision;
            }

            LoginDecision::allow(config.max_attempts - failed)
        })
    }

    /// Record the outcome of a credential check, then prune
    pub fn record_attempt(&self, username: &str, address: &str, success: bool) {
        let now = self.clock.now();
        self.record_attempt_at(username, address, success, now);
    }

    /// Record an attempt at a specific time (for replay)
    pub fn record_attempt_at(
        &self,
        username: &str,
        address: &str,
        success: bool,
        timestamp: DateTime<Utc>,
    ) {
        let now = self.clock.now();
        let cutoff = now - self.config.retention();

        self.store.with_state(|state| {
            state.push_attempt(LoginAttempt {
                username: username.to_string(),
                address: address.to_string(),
                timestamp,
                success,
            });
            state.prune(cutoff, now);
        });

        debug!(username, address, success, "Login attempt recorded");
    }

    /// Lift an account lock ahead of expiry; returns true if one existed
    pub fn unlock_account(&self, username: &str) -> bool {
        let removed = self.store.with_state(|state| state.unlock_account(username));
        if removed {
            info!(username, "Account unlocked");
        }
        removed
    }

    /// Lift an address lock ahead of expiry; returns true if one existed
    pub fn unlock_address(&self, address: &str) -> bool {
        let removed = self.store.with_state(|state| state.unlock_address(address));
        if removed {
            info!(address, "Address unlocked");
        }
        removed
    }

    pub fn stats(&self) -> GuardStats {
        let now = self.clock.now();
        self.store.with_state(|state| GuardStats {
            tracked_attempts: state.attempt_count(),
            locked_accounts: state.locked_account_count(now),
            locked_addresses: state.locked_address_count(now),
        })
    }

    pub fn check_password_strength(&self, password: &str) -> PasswordStrength {
        check_password_strength(password)
    }
}

/// Whole seconds until `until`, rounded up
fn remaining_seconds(until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (until - now).num_milliseconds().max(0);
    (millis + 999) / 1000
}
