//! Agrisub Review Engine
//!
//! Scores subsidy applications and turns the score into a review
//! recommendation.
//!
//! ```text
//! AutoReviewer::evaluate(application)
//!     │
//!     ├── RiskScorer::score ──► amount bounds, frequency, completeness,
//!     │        │                priority adjustment
//!     │        └── FraudDetector::detect ──► FraudSignalSource
//!     │
//!     ├── SimilarCaseLookup::find_similar
//!     │
//!     ▼
//! ReviewVerdict { recommendation, confidence, suggested amount, days }
//! ```
//!
//! ## Key Components
//!
//! - [`config::RiskConfig`] - Per-type amount bounds, caps, documents, base amounts
//! - [`scorer::RiskScorer`] - Additive 0-100 risk score
//! - [`fraud::FraudDetector`] - Composes pluggable fraud signals
//! - [`review::AutoReviewer`] - Recommendation, confidence and estimates
//! - [`cases::SimilarCaseLookup`] - Historical case matching

pub mod assessment;
pub mod cases;
pub mod config;
pub mod error;
pub mod fraud;
pub mod review;
pub mod scorer;

pub use assessment::{
    RiskAssessment, RiskLevel, AUTO_REJECT_THRESHOLD, HIGH_DISPLAY_THRESHOLD, LOW_THRESHOLD,
};
pub use cases::{CaseHistory, CaseOutcome, NoSimilarCases, SimilarCase, SimilarCaseLookup};
pub use config::{AmountBounds, RiskConfig};
pub use error::{RiskError, RiskResult};
pub use fraud::{DeclaredDetailsSignals, FraudDetector, FraudResult, FraudSignalSource, NoFraudSignals};
pub use review::{AutoReviewer, Recommendation, ReviewSummary, ReviewVerdict};
pub use scorer::RiskScorer;
