//! Review configuration with per-type tables
//!
//! Every table can be overridden from a JSON file; missing fields fall back
//! to the defaults below. Replacing a table replaces it entirely.

use agrisub_core::ApplicationType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{RiskError, RiskResult};

/// Accepted amount range for one application type (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl AmountBounds {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }
}

/// Configuration for the review engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    // === Amount bounds ===
    /// Types without an entry skip the amount check
    #[serde(default = "default_amount_bounds")]
    pub amount_bounds: HashMap<ApplicationType, AmountBounds>,

    // === Frequency ===
    /// Same-type applications allowed per applicant per month
    #[serde(default = "default_monthly_caps")]
    pub monthly_caps: HashMap<ApplicationType, u32>,

    /// Cap for types without an entry
    #[serde(default = "default_monthly_cap")]
    pub default_monthly_cap: u32,

    // === Completeness ===
    /// Keywords expected in attachment filenames
    #[serde(default = "default_required_documents")]
    pub required_documents: HashMap<ApplicationType, Vec<String>>,

    // === Suggested amount ===
    #[serde(default = "default_base_amounts")]
    pub base_amounts: HashMap<ApplicationType, Decimal>,

    /// Base amount for types without an entry
    #[serde(default = "default_base_amount")]
    pub default_base_amount: Decimal,

    // === Fraud signals ===
    /// Same-type count at which `DeclaredDetailsSignals` reports an abnormal pattern
    #[serde(default = "default_abnormal_pattern_count")]
    pub abnormal_pattern_count: u32,

    // === Similar cases ===
    /// Relative amount difference still considered "similar" (0.2 = 20%)
    #[serde(default = "default_similar_case_tolerance")]
    pub similar_case_tolerance: Decimal,
}

fn default_amount_bounds() -> HashMap<ApplicationType, AmountBounds> {
    HashMap::from([
        (
            ApplicationType::Education,
            AmountBounds::new(Decimal::new(1_000, 0), Decimal::new(20_000, 0)),
        ),
        (
            ApplicationType::Medical,
            AmountBounds::new(Decimal::new(500, 0), Decimal::new(50_000, 0)),
        ),
        (
            ApplicationType::Housing,
            AmountBounds::new(Decimal::new(5_000, 0), Decimal::new(100_000, 0)),
        ),
        (
            ApplicationType::Business,
            AmountBounds::new(Decimal::new(10_000, 0), Decimal::new(200_000, 0)),
        ),
    ])
}

fn default_monthly_caps() -> HashMap<ApplicationType, u32> {
    HashMap::from([
        (ApplicationType::Education, 1),
        (ApplicationType::Medical, 2),
        (ApplicationType::Housing, 1),
        (ApplicationType::Business, 1),
    ])
}

fn default_monthly_cap() -> u32 {
    1
}

fn default_required_documents() -> HashMap<ApplicationType, Vec<String>> {
    let docs = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    HashMap::from([
        (ApplicationType::Education, docs(&["schoolbill", "enrollment", "income"])),
        (ApplicationType::Medical, docs(&["diagnosis", "invoice", "income"])),
        (ApplicationType::Housing, docs(&["property", "estimate", "income"])),
        (ApplicationType::Business, docs(&["license", "plan", "financial"])),
        (ApplicationType::Other, docs(&["application", "income"])),
    ])
}

fn default_base_amounts() -> HashMap<ApplicationType, Decimal> {
    HashMap::from([
        (ApplicationType::Education, Decimal::new(5_000, 0)),
        (ApplicationType::Medical, Decimal::new(3_000, 0)),
        (ApplicationType::Housing, Decimal::new(8_000, 0)),
        (ApplicationType::Business, Decimal::new(10_000, 0)),
    ])
}

fn default_base_amount() -> Decimal {
    Decimal::new(5_000, 0)
}

fn default_abnormal_pattern_count() -> u32 {
    3
}

fn default_similar_case_tolerance() -> Decimal {
    Decimal::new(2, 1) // 0.2
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            amount_bounds: default_amount_bounds(),
            monthly_caps: default_monthly_caps(),
            default_monthly_cap: default_monthly_cap(),
            required_documents: default_required_documents(),
            base_amounts: default_base_amounts(),
            default_base_amount: default_base_amount(),
            abnormal_pattern_count: default_abnormal_pattern_count(),
            similar_case_tolerance: default_similar_case_tolerance(),
        }
    }
}

impl RiskConfig {
    /// Load configuration from a JSON file and validate it
    pub fn from_file(path: &Path) -> RiskResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RiskConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tables that cannot be applied consistently
    pub fn validate(&self) -> RiskResult<()> {
        for (kind, bounds) in &self.amount_bounds {
            if bounds.min > bounds.max {
                return Err(RiskError::ConfigError(format!(
                    "amount bounds for {}: min {} exceeds max {}",
                    kind, bounds.min, bounds.max
                )));
            }
        }
        if self.similar_case_tolerance < Decimal::ZERO {
            return Err(RiskError::ConfigError(format!(
                "similar_case_tolerance must not be negative, got {}",
                self.similar_case_tolerance
            )));
        }
        Ok(())
    }

    /// Amount bounds for a type, if any are configured
    pub fn bounds_for(&self, kind: &ApplicationType) -> Option<&AmountBounds> {
        self.amount_bounds.get(kind)
    }

    /// Monthly cap for a type
    pub fn monthly_cap(&self, kind: &ApplicationType) -> u32 {
        self.monthly_caps
            .get(kind)
            .copied()
            .unwrap_or(self.default_monthly_cap)
    }

    /// Required document keywords for a type (empty if none configured)
    pub fn required_documents(&self, kind: &ApplicationType) -> &[String] {
        self.required_documents
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Base amount used for the suggested amount
    pub fn base_amount(&self, kind: &ApplicationType) -> Decimal {
        self.base_amounts
            .get(kind)
            .copied()
            .unwrap_or(self.default_base_amount)
    }
}
