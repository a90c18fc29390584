//! Agrisub CLI - command orchestration
//!
//! This crate provides the `agrisub` binary. Commands write to any
//! `io::Write` so they can be driven from tests.

pub mod commands;
pub mod context;

pub use context::{load_applications, ReviewContext};
