//! Agrisub Core - Domain types
//!
//! This crate contains the fundamental types shared by the review and
//! login-guard engines:
//! - `Application`: a subsidy application as submitted by an applicant
//! - `ApplicationType`: subsidy category with a fallback for unknown codes
//! - `Priority`: reviewer-assigned urgency
//! - `Amount`: strictly positive decimal wrapper for requested amounts

pub mod amount;
pub mod application;
pub mod error;

pub use amount::Amount;
pub use application::{Application, ApplicationType, Priority};
pub use error::{CoreError, CoreResult};
