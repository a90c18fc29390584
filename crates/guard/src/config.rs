//! Login guard configuration
//!
//! All limits can be overridden from a JSON file; missing fields use the
//! defaults below.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GuardError, GuardResult};

/// Upper bound for every window and lockout length (one year)
pub const MAX_DURATION_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration for the login guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGuardConfig {
    /// Failed attempts per username tolerated within the window
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Sliding window for failed-attempt counting and ledger pruning (seconds)
    #[serde(default = "default_window_secs")]
    pub window_secs: i64,

    /// How long an account or address stays locked (seconds)
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: i64,

    /// Attempts per address tolerated within the rate window
    #[serde(default = "default_ip_rate_limit")]
    pub ip_rate_limit: u32,

    /// Window for the per-address rate limit (seconds)
    #[serde(default = "default_ip_rate_window_secs")]
    pub ip_rate_window_secs: i64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_window_secs() -> i64 {
    5 * 60
}

fn default_lockout_secs() -> i64 {
    15 * 60
}

fn default_ip_rate_limit() -> u32 {
    30
}

fn default_ip_rate_window_secs() -> i64 {
    60
}

impl Default for LoginGuardConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_secs: default_window_secs(),
            lockout_secs: default_lockout_secs(),
            ip_rate_limit: default_ip_rate_limit(),
            ip_rate_window_secs: default_ip_rate_window_secs(),
        }
    }
}

impl LoginGuardConfig {
    /// Load configuration from a JSON file and validate it
    pub fn from_file(path: &Path) -> GuardResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoginGuardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GuardResult<()> {
        if self.max_attempts == 0 {
            return Err(GuardError::ConfigError("max_attempts must be at least 1".into()));
        }
        if self.ip_rate_limit == 0 {
            return Err(GuardError::ConfigError("ip_rate_limit must be at least 1".into()));
        }
        for (name, secs) in [
            ("window_secs", self.window_secs),
            ("lockout_secs", self.lockout_secs),
            ("ip_rate_window_secs", self.ip_rate_window_secs),
        ] {
            if secs <= 0 {
                return Err(GuardError::ConfigError(format!(
                    "{} must be positive, got {}",
                    name, secs
                )));
            }
            if secs > MAX_DURATION_SECS {
                return Err(GuardError::ConfigError(format!(
                    "{} must be at most {} (one year), got {}",
                    name, MAX_DURATION_SECS, secs
                )));
            }
        }
        Ok(())
    }

    /// Failed-attempt window as chrono Duration
    pub fn window(&self) -> Duration {
        bounded_seconds(self.window_secs)
    }

    /// Lockout length as chrono Duration
    pub fn lockout(&self) -> Duration {
        bounded_seconds(self.lockout_secs)
    }

    /// Per-address rate window as chrono Duration
    pub fn ip_rate_window(&self) -> Duration {
        bounded_seconds(self.ip_rate_window_secs)
    }

    /// How long attempts must be retained to answer both window queries
    pub fn retention(&self) -> Duration {
        self.window().max(self.ip_rate_window())
    }
}

/// Values outside 0..=MAX_DURATION_SECS are clamped for configs that skipped `validate`
fn bounded_seconds(secs: i64) -> Duration {
    Duration::seconds(secs.clamp(0, MAX_DURATION_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = LoginGuardConfig::default();

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.window(), Duration::minutes(5));
        assert_eq!(config.lockout(), Duration::minutes(15));
        assert_eq!(config.ip_rate_limit, 30);
        assert_eq!(config.ip_rate_window(), Duration::seconds(60));
        assert_eq!(config.retention(), Duration::minutes(5));
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "max_attempts": 3, "ip_rate_window_secs": 600 }"#;
        let config: LoginGuardConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.lockout_secs, 900); // default
        assert_eq!(config.retention(), Duration::minutes(10));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "lockout_secs": 60 }}"#).unwrap();

        let config = LoginGuardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.lockout(), Duration::minutes(1));
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn test_validation() {
        let zero_attempts = LoginGuardConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(zero_attempts.validate(), Err(GuardError::ConfigError(_))));

        let negative_window = LoginGuardConfig {
            window_secs: -5,
            ..Default::default()
        };
        let err = negative_window.validate().unwrap_err();
        assert!(err.to_string().contains("window_secs"));
    }

    #[test]
    fn test_validation_rejects_oversized_durations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "lockout_secs": 9223372036854775807 }}"#).unwrap();
        let err = LoginGuardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, GuardError::ConfigError(_)));
        assert!(err.to_string().contains("lockout_secs"));

        let huge_window = LoginGuardConfig {
            window_secs: i64::MAX,
            ..Default::default()
        };
        assert!(matches!(huge_window.validate(), Err(GuardError::ConfigError(_))));

        let one_year = LoginGuardConfig {
            ip_rate_window_secs: MAX_DURATION_SECS,
            lockout_secs: MAX_DURATION_SECS,
            ..Default::default()
        };
        assert!(one_year.validate().is_ok());
        assert_eq!(one_year.lockout(), Duration::days(365));
    }
}
