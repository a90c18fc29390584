//! Risk assessment value objects
//!
//! Two thresholds sit above the low band and they are deliberately kept
//! apart: `HIGH_DISPLAY_THRESHOLD` decides the level shown to reviewers,
//! `AUTO_REJECT_THRESHOLD` decides when the auto-reviewer rejects.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::fraud::FraudResult;

/// Scores at or below this are `Low` and auto-approved
pub const LOW_THRESHOLD: u8 = 30;

/// Scores above this are displayed as `High`
pub const HIGH_DISPLAY_THRESHOLD: u8 = 60;

/// Scores at or above this are auto-rejected
pub const AUTO_REJECT_THRESHOLD: u8 = 80;

/// Risk level - ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

impl RiskLevel {
    /// Derive the display level from a clamped score
    pub fn from_score(score: u8) -> Self {
        if score <= LOW_THRESHOLD {
            RiskLevel::Low
        } else if score <= HIGH_DISPLAY_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

/// Result of scoring one application
///
/// Factors and recommendations are appended in evaluation order and never
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Clamped score (0-100)
    pub score: u8,
    pub level: RiskLevel,
    /// Human-readable contributing risks
    pub factors: Vec<String>,
    /// Human-readable remediation steps
    pub recommendations: Vec<String>,
    /// Fraction of required documents found among the attachments (0.0-1.0)
    pub completeness: f64,
    /// Fraud signal that fed into the score
    pub fraud: FraudResult,
}

impl RiskAssessment {
    pub fn is_low(&self) -> bool {
        self.level == RiskLevel::Low
    }

    pub fn is_high(&self) -> bool {
        self.level == RiskLevel::High
    }
}
