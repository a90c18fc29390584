//! Agrisub Login Guard
//!
//! Advisory throttling in front of credential verification:
//!
//! ```text
//! check_login_allowed(username, address)   ← before verifying credentials
//!     │  account lock? address lock? address rate? failed-attempt count?
//!     ▼
//! verify credentials (caller)
//!     │
//!     ▼
//! record_attempt(username, address, success)   ← after
//! ```
//!
//! State lives in an explicit [`store::LoginGuardStore`] (mutex-guarded,
//! in-memory only; a restart clears every lockout) and time comes from an
//! injectable [`clock::Clock`].

pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
pub mod password;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LoginGuardConfig;
pub use error::{GuardError, GuardResult};
pub use guard::{DenyReason, GuardStats, LoginDecision, LoginGuard};
pub use password::{check_password_strength, PasswordLevel, PasswordStrength};
pub use store::{GuardState, LoginAttempt, LoginGuardStore};
