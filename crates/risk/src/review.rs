//! Auto-reviewer - turns a risk assessment into a recommendation
//!
//! Decision rule, first match wins:
//! 1. score <= `LOW_THRESHOLD` → Approve (0.9)
//! 2. score >= `AUTO_REJECT_THRESHOLD` → Reject (0.8)
//! 3. otherwise → ManualReview (0.5)
//!
//! A suspicious fraud signal then forces ManualReview, and similar
//! historical cases raise confidence.

use std::sync::Arc;

use agrisub_core::{Application, Priority};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assessment::{RiskAssessment, RiskLevel, AUTO_REJECT_THRESHOLD, LOW_THRESHOLD};
use crate::cases::{NoSimilarCases, SimilarCaseLookup};
use crate::scorer::RiskScorer;

const APPROVE_CONFIDENCE: f64 = 0.9;
const REJECT_CONFIDENCE: f64 = 0.8;
const MANUAL_CONFIDENCE: f64 = 0.5;
const FRAUD_CONFIDENCE_FLOOR: f64 = 0.85;
const SIMILAR_CASE_BONUS: f64 = 0.1;

const BASE_PROCESSING_DAYS: i32 = 3;
const INCOMPLETE_THRESHOLD: f64 = 0.8;

/// Auto-review outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    Reject,
    ManualReview,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Reject => "REJECT",
            Recommendation::ManualReview => "MANUAL_REVIEW",
        }
    }
}

/// Composite verdict for one application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    pub application_id: String,
    pub recommendation: Recommendation,
    /// Confidence in the recommendation (0.0-1.0)
    pub confidence: f64,
    pub assessment: RiskAssessment,
    pub reasons: Vec<String>,
    pub suggested_amount: Option<Decimal>,
    /// Always at least one day
    pub processing_time_estimate_days: u32,
    /// Number of similar historical cases found
    pub similar_cases: usize,
}

/// Tally over a batch of verdicts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    pub manual_review: usize,
    pub mean_score: f64,
}

impl ReviewSummary {
    pub fn from_verdicts(verdicts: &[ReviewVerdict]) -> Self {
        let mut summary = ReviewSummary {
            total: verdicts.len(),
            ..Default::default()
        };

        for verdict in verdicts {
            match verdict.recommendation {
                Recommendation::Approve => summary.approved += 1,
                Recommendation::Reject => summary.rejected += 1,
                Recommendation::ManualReview => summary.manual_review += 1,
            }
        }

        if !verdicts.is_empty() {
            let total: u32 = verdicts.iter().map(|v| u32::from(v.assessment.score)).sum();
            summary.mean_score = f64::from(total) / verdicts.len() as f64;
        }

        summary
    }
}

/// Combines the scorer, fraud signal and case history into a verdict
pub struct AutoReviewer {
    scorer: RiskScorer,
    cases: Arc<dyn SimilarCaseLookup>,
}

impl AutoReviewer {
    pub fn new(scorer: RiskScorer, cases: Arc<dyn SimilarCaseLookup>) -> Self {
        Self { scorer, cases }
    }

    /// Reviewer with default tables, no fraud signals and no case history
    pub fn with_defaults() -> Self {
        Self::new(RiskScorer::default(), Arc::new(NoSimilarCases))
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Evaluate one application
    pub fn evaluate(&self, application: &Application) -> ReviewVerdict {
        let assessment = self.scorer.score(application);
        let mut reasons = Vec::new();

        let (mut recommendation, mut confidence) = if assessment.score <= LOW_THRESHOLD {
            reasons.push("risk score low".to_string());
            (Recommendation::Approve, APPROVE_CONFIDENCE)
        } else if assessment.score >= AUTO_REJECT_THRESHOLD {
            reasons.push("risk score too high".to_string());
            (Recommendation::Reject, REJECT_CONFIDENCE)
        } else {
            reasons.push("risk score requires manual review".to_string());
            (Recommendation::ManualReview, MANUAL_CONFIDENCE)
        };

        if assessment.fraud.is_suspicious {
            recommendation = Recommendation::ManualReview;
            confidence = confidence.max(FRAUD_CONFIDENCE_FLOOR);
            reasons.extend(assessment.fraud.reasons.iter().cloned());
        }

        let similar = self.cases.find_similar(application);
        if !similar.is_empty() {
            confidence = (confidence + SIMILAR_CASE_BONUS).min(1.0);
            reasons.push(format!("{} similar historical case(s) found", similar.len()));
        }

        let suggested_amount = Some(self.suggested_amount(application));
        let processing_time_estimate_days = processing_days(application.priority, &assessment);

        tracing::info!(
            application = %application.id,
            applicant = %application.applicant_id,
            score = assessment.score,
            recommendation = recommendation.as_str(),
            confidence,
            similar_cases = similar.len(),
            "Application reviewed"
        );

        ReviewVerdict {
            application_id: application.id.clone(),
            recommendation,
            confidence: confidence.clamp(0.0, 1.0),
            assessment,
            reasons,
            suggested_amount,
            processing_time_estimate_days,
            similar_cases: similar.len(),
        }
    }

    /// Evaluate applications in order
    pub fn evaluate_batch(&self, applications: &[Application]) -> Vec<ReviewVerdict> {
        applications.iter().map(|app| self.evaluate(app)).collect()
    }

    /// Base amount for the type scaled by priority
    pub fn suggested_amount(&self, application: &Application) -> Decimal {
        self.scorer.config().base_amount(&application.application_type)
            * priority_multiplier(application.priority)
    }
}

impl Default for AutoReviewer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn priority_multiplier(priority: Priority) -> Decimal {
    match priority {
        Priority::High => dec!(1.2),
        Priority::Medium => dec!(1.0),
        Priority::Low => dec!(0.8),
    }
}

fn processing_days(priority: Priority, assessment: &RiskAssessment) -> u32 {
    let priority_days = match priority {
        Priority::High => -1,
        Priority::Medium => 0,
        Priority::Low => 1,
    };
    let completeness_days = if assessment.completeness < INCOMPLETE_THRESHOLD { 2 } else { 0 };
    let risk_days = if assessment.level == RiskLevel::High { 2 } else { 0 };

    (BASE_PROCESSING_DAYS + priority_days + completeness_days + risk_days).max(1) as u32
}
