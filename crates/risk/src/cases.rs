//! Similar-case lookup
//!
//! The auto-reviewer is more confident when comparable applications have
//! already been decided. Lookup is a trait so a database-backed history can
//! replace the in-memory one.

use std::path::Path;

use agrisub_core::{Application, ApplicationType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Final outcome of a historical case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    Approved,
    Rejected,
}

/// A previously decided application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub application_id: String,
    #[serde(rename = "type")]
    pub application_type: ApplicationType,
    pub amount: Decimal,
    pub outcome: CaseOutcome,
}

/// Finds historical cases comparable to an application
pub trait SimilarCaseLookup: Send + Sync {
    fn find_similar(&self, application: &Application) -> Vec<SimilarCase>;
}

/// Lookup that never finds anything
pub struct NoSimilarCases;

impl SimilarCaseLookup for NoSimilarCases {
    fn find_similar(&self, _application: &Application) -> Vec<SimilarCase> {
        Vec::new()
    }
}

/// In-memory history of decided cases
///
/// A case is similar when it has the same type and its amount is within
/// `tolerance` (relative to the application's amount). The application's
/// own id never matches.
#[derive(Debug, Clone, Default)]
pub struct CaseHistory {
    cases: Vec<SimilarCase>,
    tolerance: Decimal,
}

impl CaseHistory {
    pub fn new(tolerance: Decimal) -> Self {
        Self {
            cases: Vec::new(),
            tolerance,
        }
    }

    /// Load cases from a JSON array file
    pub fn from_file(path: &Path, tolerance: Decimal) -> RiskResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let cases: Vec<SimilarCase> = serde_json::from_str(&content)?;
        if let Some(case) = cases.iter().find(|c| c.amount.is_sign_negative()) {
            return Err(RiskError::ConfigError(format!(
                "case {} has negative amount {}",
                case.application_id, case.amount
            )));
        }
        Ok(Self { cases, tolerance })
    }

    /// Record a decided case
    pub fn record(&mut self, case: SimilarCase) {
        self.cases.push(case);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl SimilarCaseLookup for CaseHistory {
    fn find_similar(&self, application: &Application) -> Vec<SimilarCase> {
        let amount = application.amount.value();
        // Overflowing arithmetic never counts as a match
        let Some(max_diff) = amount.checked_mul(self.tolerance) else {
            return Vec::new();
        };

        self.cases
            .iter()
            .filter(|case| case.application_id != application.id)
            .filter(|case| case.application_type == application.application_type)
            .filter(|case| {
                case.amount
                    .checked_sub(amount)
                    .is_some_and(|diff| diff.abs() <= max_diff)
            })
            .cloned()
            .collect()
    }
}
