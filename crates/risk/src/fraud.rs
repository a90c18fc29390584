//! Fraud detection
//!
//! `FraudDetector` owns the composition rule (fixed points per triggered
//! check, suspicious above 50). Where the signals come from is pluggable via
//! [`FraudSignalSource`], so a real data source can replace the stub without
//! touching the scoring.

use std::collections::HashSet;
use std::sync::Arc;

use agrisub_core::Application;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const DOCUMENT_INCONSISTENCY_POINTS: u32 = 30;
const ABNORMAL_PATTERN_POINTS: u32 = 25;
const ADVERSE_CREDIT_POINTS: u32 = 20;
const SUSPICIOUS_ABOVE: u32 = 50;

/// Output of [`FraudDetector::detect`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudResult {
    pub is_suspicious: bool,
    /// Additive score (0-100)
    pub score: u8,
    pub reasons: Vec<String>,
    /// Machine-readable codes of the triggered checks
    pub patterns: Vec<String>,
}

/// Source of the individual fraud checks
pub trait FraudSignalSource: Send + Sync {
    /// Source name for logging/debugging
    fn name(&self) -> &str;

    /// Submitted documents contradict each other or the form
    fn document_inconsistency(&self, application: &Application) -> bool;

    /// The applicant's submission pattern looks abnormal
    fn abnormal_pattern(&self, application: &Application) -> bool;

    /// Adverse credit-history issues, one entry per issue
    fn credit_issues(&self, application: &Application) -> Vec<String>;
}

/// Signal source that never reports an issue
pub struct NoFraudSignals;

impl FraudSignalSource for NoFraudSignals {
    fn name(&self) -> &str {
        "no_fraud_signals"
    }

    fn document_inconsistency(&self, _application: &Application) -> bool {
        false
    }

    fn abnormal_pattern(&self, _application: &Application) -> bool {
        false
    }

    fn credit_issues(&self, _application: &Application) -> Vec<String> {
        Vec::new()
    }
}

/// Signal source driven by what the applicant declared on the form
///
/// - inconsistency: `declared_amount` differs from the requested amount, or
///   the same attachment was submitted twice
/// - abnormal pattern: same-type count this period reaches `abnormal_count`
/// - credit issues: `credit_issues` detail, `;`-separated
pub struct DeclaredDetailsSignals {
    abnormal_count: u32,
}

impl DeclaredDetailsSignals {
    pub const DECLARED_AMOUNT: &'static str = "declared_amount";
    pub const CREDIT_ISSUES: &'static str = "credit_issues";

    pub fn new(abnormal_count: u32) -> Self {
        Self { abnormal_count }
    }
}

impl FraudSignalSource for DeclaredDetailsSignals {
    fn name(&self) -> &str {
        "declared_details"
    }

    fn document_inconsistency(&self, application: &Application) -> bool {
        let declared_mismatch = application
            .detail(Self::DECLARED_AMOUNT)
            .and_then(|raw| raw.trim().parse::<Decimal>().ok())
            .is_some_and(|declared| declared != application.amount.value());

        let mut seen = HashSet::new();
        let duplicate_attachment = application
            .attachments
            .iter()
            .any(|name| !seen.insert(name.trim().to_lowercase()));

        declared_mismatch || duplicate_attachment
    }

    fn abnormal_pattern(&self, application: &Application) -> bool {
        self.abnormal_count > 0 && application.same_type_count_this_period >= self.abnormal_count
    }

    fn credit_issues(&self, application: &Application) -> Vec<String> {
        application
            .detail(Self::CREDIT_ISSUES)
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|issue| !issue.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Composes fraud signals into a score and a suspicious flag
#[derive(Clone)]
pub struct FraudDetector {
    source: Arc<dyn FraudSignalSource>,
}

impl FraudDetector {
    pub fn new(source: Arc<dyn FraudSignalSource>) -> Self {
        Self { source }
    }

    /// Name of the underlying signal source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Run all checks against an application
    pub fn detect(&self, application: &Application) -> FraudResult {
        let mut score = 0u32;
        let mut reasons = Vec::new();
        let mut patterns = Vec::new();

        if self.source.document_inconsistency(application) {
            score += DOCUMENT_INCONSISTENCY_POINTS;
            reasons.push("document information inconsistent".to_string());
            patterns.push("DOCUMENT_INCONSISTENCY".to_string());
        }

        if self.source.abnormal_pattern(application) {
            score += ABNORMAL_PATTERN_POINTS;
            reasons.push("abnormal application pattern".to_string());
            patterns.push("ABNORMAL_PATTERN".to_string());
        }

        let credit_issues = self.source.credit_issues(application);
        if !credit_issues.is_empty() {
            score += ADVERSE_CREDIT_POINTS;
            reasons.extend(
                credit_issues
                    .into_iter()
                    .map(|issue| format!("adverse credit history: {}", issue)),
            );
            patterns.push("ADVERSE_CREDIT".to_string());
        }

        let score = score.min(100);
        let is_suspicious = score > SUSPICIOUS_ABOVE;

        if is_suspicious {
            tracing::warn!(
                application = %application.id,
                source = self.source.name(),
                score,
                "Application flagged as suspicious"
            );
        }

        FraudResult {
            is_suspicious,
            score: score as u8,
            reasons,
            patterns,
        }
    }
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new(Arc::new(NoFraudSignals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisub_core::{ApplicationType, Priority};
    use rust_decimal_macros::dec;

    /// Source with every check switched by the test
    struct FixedSignals {
        inconsistent: bool,
        abnormal: bool,
        credit: Vec<String>,
    }

    impl FraudSignalSource for FixedSignals {
        fn name(&self) -> &str {
            "fixed"
        }

        fn document_inconsistency(&self, _application: &Application) -> bool {
            self.inconsistent
        }

        fn abnormal_pattern(&self, _application: &Application) -> bool {
            self.abnormal
        }

        fn credit_issues(&self, _application: &Application) -> Vec<String> {
            self.credit.clone()
        }
    }

    fn application() -> Application {
        Application::new("FAM-001", ApplicationType::Medical, dec!(3000), Priority::Medium).unwrap()
    }

    fn detector(inconsistent: bool, abnormal: bool, credit: &[&str]) -> FraudDetector {
        FraudDetector::new(Arc::new(FixedSignals {
            inconsistent,
            abnormal,
            credit: credit.iter().map(|s| s.to_string()).collect(),
        }))
    }

    #[test]
    fn test_stub_source_is_clean() {
        let result = FraudDetector::default().detect(&application());

        assert!(!result.is_suspicious);
        assert_eq!(result.score, 0);
        assert!(result.reasons.is_empty());
        assert!(result.patterns.is_empty());
    }

    #[test]
    fn test_single_check_not_suspicious() {
        let result = detector(true, false, &[]).detect(&application());

        assert_eq!(result.score, 30);
        assert!(!result.is_suspicious);
        assert_eq!(result.patterns, vec!["DOCUMENT_INCONSISTENCY"]);
    }

    #[test]
    fn test_two_checks_suspicious() {
        let result = detector(true, true, &[]).detect(&application());

        assert_eq!(result.score, 55);
        assert!(result.is_suspicious);
        assert_eq!(result.reasons.len(), 2);
    }

    #[test]
    fn test_exactly_fifty_is_not_suspicious() {
        let result = detector(true, false, &["late repayment"]).detect(&application());

        assert_eq!(result.score, 50);
        assert!(!result.is_suspicious);
    }

    #[test]
    fn test_credit_issues_add_one_reason_each() {
        let result = detector(false, false, &["loan default", "court judgment"]).detect(&application());

        // Fixed points regardless of issue count
        assert_eq!(result.score, 20);
        assert_eq!(
            result.reasons,
            vec![
                "adverse credit history: loan default",
                "adverse credit history: court judgment"
            ]
        );
    }

    #[test]
    fn test_all_checks() {
        let result = detector(true, true, &["loan default"]).detect(&application());

        assert_eq!(result.score, 75);
        assert!(result.is_suspicious);
        assert_eq!(
            result.patterns,
            vec!["DOCUMENT_INCONSISTENCY", "ABNORMAL_PATTERN", "ADVERSE_CREDIT"]
        );
    }

    #[test]
    fn test_declared_amount_mismatch() {
        let signals = DeclaredDetailsSignals::new(3);

        let matching = application().with_detail("declared_amount", "3000.00");
        assert!(!signals.document_inconsistency(&matching));

        let mismatch = application().with_detail("declared_amount", "4500");
        assert!(signals.document_inconsistency(&mismatch));

        let unparsable = application().with_detail("declared_amount", "three thousand");
        assert!(!signals.document_inconsistency(&unparsable));
    }

    #[test]
    fn test_duplicate_attachment_is_inconsistent() {
        let signals = DeclaredDetailsSignals::new(3);
        let app = application().with_attachments(["invoice.pdf", "Invoice.PDF"]);

        assert!(signals.document_inconsistency(&app));
    }

    #[test]
    fn test_abnormal_pattern_threshold() {
        let signals = DeclaredDetailsSignals::new(3);

        assert!(!signals.abnormal_pattern(&application().with_same_type_count(2)));
        assert!(signals.abnormal_pattern(&application().with_same_type_count(3)));
        assert!(!DeclaredDetailsSignals::new(0).abnormal_pattern(&application().with_same_type_count(9)));
    }

    #[test]
    fn test_credit_issues_parsing() {
        let signals = DeclaredDetailsSignals::new(3);
        let app = application().with_detail("credit_issues", "loan default; ;unpaid tax ");

        assert_eq!(signals.credit_issues(&app), vec!["loan default", "unpaid tax"]);
        assert!(signals.credit_issues(&application()).is_empty());
    }
}
