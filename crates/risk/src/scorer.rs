//! Risk scorer - additive point accumulation clamped to 0-100

use agrisub_core::{Application, Priority};

use crate::assessment::{RiskAssessment, RiskLevel};
use crate::config::RiskConfig;
use crate::fraud::FraudDetector;

const BELOW_MINIMUM_POINTS: i32 = 10;
const ABOVE_MAXIMUM_POINTS: i32 = 30;
const FREQUENCY_POINTS: i32 = 25;
const CRITICAL_MISSING_POINTS: i32 = 30;
const SOME_MISSING_POINTS: i32 = 15;

const CRITICAL_COMPLETENESS: f64 = 0.6;
const SUFFICIENT_COMPLETENESS: f64 = 0.8;

/// Extensions ignored when matching document keywords
const IGNORED_EXTENSIONS: [&str; 2] = [".pdf", ".jpg"];

/// Scores subsidy applications
///
/// Pure with respect to the application: no state is kept between calls.
#[derive(Clone)]
pub struct RiskScorer {
    config: RiskConfig,
    fraud: FraudDetector,
}

impl RiskScorer {
    pub fn new(config: RiskConfig, fraud: FraudDetector) -> Self {
        Self { config, fraud }
    }

    /// Scorer with default tables and no fraud signals
    pub fn with_defaults() -> Self {
        Self::new(RiskConfig::default(), FraudDetector::default())
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn fraud_detector(&self) -> &FraudDetector {
        &self.fraud
    }

    /// Score an application
    pub fn score(&self, application: &Application) -> RiskAssessment {
        let mut points: i32 = 0;
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();
        let kind = &application.application_type;

        // Step 1: amount bounds
        match self.config.bounds_for(kind) {
            Some(bounds) => {
                let amount = application.amount.value();
                if amount < bounds.min {
                    points += BELOW_MINIMUM_POINTS;
                    factors.push("amount below minimum standard".to_string());
                    recommendations.push(format!(
                        "confirm the requested amount; minimum for {} is {}",
                        kind, bounds.min
                    ));
                } else if amount > bounds.max {
                    points += ABOVE_MAXIMUM_POINTS;
                    factors.push("amount exceeds maximum limit".to_string());
                    recommendations.push(format!(
                        "reduce the requested amount to at most {}",
                        bounds.max
                    ));
                }
            }
            None => {
                tracing::debug!(
                    application = %application.id,
                    kind = %kind,
                    "No amount bounds configured, skipping amount check"
                );
            }
        }

        // Step 2: frequency
        let cap = self.config.monthly_cap(kind);
        if application.same_type_count_this_period >= cap {
            points += FREQUENCY_POINTS;
            factors.push("monthly application count exceeded".to_string());
            recommendations.push(format!(
                "review the applicant's other {} applications this month (cap {})",
                kind, cap
            ));
        }

        // Step 3: completeness
        let completeness = self.completeness(application);
        if completeness < CRITICAL_COMPLETENESS {
            points += CRITICAL_MISSING_POINTS;
            factors.push("critical materials missing".to_string());
            recommendations.push(self.missing_documents_request(application));
        } else if completeness < SUFFICIENT_COMPLETENESS {
            points += SOME_MISSING_POINTS;
            factors.push("some materials missing".to_string());
            recommendations.push(self.missing_documents_request(application));
        }

        // Step 4: fraud signal
        let fraud = self.fraud.detect(application);
        if fraud.is_suspicious {
            points += i32::from(fraud.score);
            factors.extend(fraud.reasons.iter().cloned());
            recommendations.push("recommend on-site verification".to_string());
        }

        // Step 5: priority, then clamp
        points += priority_adjustment(application.priority);
        let score = points.clamp(0, 100) as u8;

        // Step 6: level
        let level = RiskLevel::from_score(score);

        tracing::debug!(
            application = %application.id,
            raw = points,
            score,
            level = level.as_str(),
            completeness,
            factors = factors.len(),
            "Application scored"
        );

        RiskAssessment {
            score,
            level,
            factors,
            recommendations,
            completeness,
            fraud,
        }
    }

    /// Fraction of required document keywords found in attachment names
    ///
    /// Types without required documents score 0.0.
    pub fn completeness(&self, application: &Application) -> f64 {
        let required = self.config.required_documents(&application.application_type);
        if required.is_empty() {
            return 0.0;
        }

        let names: Vec<String> = application
            .attachments
            .iter()
            .map(|name| normalize_attachment(name))
            .collect();

        let found = required
            .iter()
            .filter(|keyword| {
                let keyword = keyword.to_lowercase();
                names.iter().any(|name| name.contains(&keyword))
            })
            .count();

        found as f64 / required.len() as f64
    }

    /// Keywords of required documents not found among the attachments
    pub fn missing_documents(&self, application: &Application) -> Vec<String> {
        let names: Vec<String> = application
            .attachments
            .iter()
            .map(|name| normalize_attachment(name))
            .collect();

        self.config
            .required_documents(&application.application_type)
            .iter()
            .filter(|keyword| {
                let keyword = keyword.to_lowercase();
                !names.iter().any(|name| name.contains(&keyword))
            })
            .cloned()
            .collect()
    }

    fn missing_documents_request(&self, application: &Application) -> String {
        let missing = self.missing_documents(application);
        if missing.is_empty() {
            "request the required supporting documents".to_string()
        } else {
            format!("request missing documents: {}", missing.join(", "))
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Score points added for the reviewer-assigned priority
fn priority_adjustment(priority: Priority) -> i32 {
    match priority {
        Priority::High => -20,
        Priority::Medium => 0,
        Priority::Low => 10,
    }
}

/// Lowercase a filename and strip an ignored extension
fn normalize_attachment(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    IGNORED_EXTENSIONS
        .iter()
        .find_map(|ext| lower.strip_suffix(ext))
        .map(String::from)
        .unwrap_or(lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fraud::{FraudSignalSource, NoFraudSignals};
    use agrisub_core::ApplicationType;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct AlwaysSuspicious;

    impl FraudSignalSource for AlwaysSuspicious {
        fn name(&self) -> &str {
            "always_suspicious"
        }

        fn document_inconsistency(&self, _application: &Application) -> bool {
            true
        }

        fn abnormal_pattern(&self, _application: &Application) -> bool {
            true
        }

        fn credit_issues(&self, _application: &Application) -> Vec<String> {
            vec!["loan default".to_string()]
        }
    }

    fn education(amount: Decimal, priority: Priority) -> Application {
        Application::new("FAM-001", ApplicationType::Education, amount, priority).unwrap()
    }

    fn complete_education(amount: Decimal, priority: Priority) -> Application {
        education(amount, priority).with_attachments([
            "SchoolBill_2024.pdf",
            "enrollment-proof.jpg",
            "household_income.pdf",
        ])
    }

    #[test]
    fn test_clean_application_is_low() {
        let scorer = RiskScorer::default();
        let result = scorer.score(&complete_education(dec!(5000), Priority::Medium));

        assert_eq!(result.score, 0);
        assert_eq!(result.level, RiskLevel::Low);
        assert!(result.factors.is_empty());
        assert!(result.recommendations.is_empty());
        assert_eq!(result.completeness, 1.0);
    }

    #[test]
    fn test_amount_above_maximum() {
        let scorer = RiskScorer::default();
        let in_bounds = scorer.score(&complete_education(dec!(20000), Priority::Medium));
        let over = scorer.score(&complete_education(dec!(20000.01), Priority::Medium));

        assert_eq!(over.score - in_bounds.score, 30);
        assert_eq!(over.factors, vec!["amount exceeds maximum limit"]);
    }

    #[test]
    fn test_amount_below_minimum() {
        let scorer = RiskScorer::default();
        let result = scorer.score(&complete_education(dec!(999), Priority::Medium));

        assert_eq!(result.score, 10);
        assert_eq!(result.factors, vec!["amount below minimum standard"]);
    }

    #[test]
    fn test_unrecognized_type_skips_amount_check() {
        let scorer = RiskScorer::default();
        let app = Application::new(
            "FAM-001",
            ApplicationType::Unrecognized("irrigation".to_string()),
            dec!(1000000),
            Priority::Medium,
        )
        .unwrap();

        let result = scorer.score(&app);

        assert!(!result.factors.contains(&"amount exceeds maximum limit".to_string()));
        // No required documents configured: completeness falls back to zero
        assert_eq!(result.completeness, 0.0);
        assert_eq!(result.score, 30);
    }

    #[test]
    fn test_frequency_cap() {
        let scorer = RiskScorer::default();

        let first = scorer.score(&complete_education(dec!(5000), Priority::Medium));
        assert!(!first.factors.contains(&"monthly application count exceeded".to_string()));

        let second = scorer.score(&complete_education(dec!(5000), Priority::Medium).with_same_type_count(1));
        assert_eq!(second.score, 25);
        assert_eq!(second.factors, vec!["monthly application count exceeded"]);

        // Medical allows two per month
        let medical = Application::new("FAM-001", ApplicationType::Medical, dec!(3000), Priority::Medium)
            .unwrap()
            .with_attachments(["diagnosis.pdf", "invoice.pdf", "income.pdf"])
            .with_same_type_count(1);
        assert_eq!(scorer.score(&medical).score, 0);
    }

    #[test]
    fn test_completeness_bands() {
        let scorer = RiskScorer::default();

        let two_of_three = education(dec!(5000), Priority::Medium)
            .with_attachments(["schoolbill.pdf", "enrollment.pdf"]);
        let result = scorer.score(&two_of_three);
        assert!((result.completeness - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.score, 15);
        assert_eq!(result.factors, vec!["some materials missing"]);
        assert_eq!(result.recommendations, vec!["request missing documents: income"]);

        let one_of_three = education(dec!(5000), Priority::Medium).with_attachment("schoolbill.pdf");
        let result = scorer.score(&one_of_three);
        assert_eq!(result.score, 30);
        assert_eq!(result.factors, vec!["critical materials missing"]);
    }

    #[test]
    fn test_completeness_matching_rules() {
        let scorer = RiskScorer::default();

        let app = education(dec!(5000), Priority::Medium).with_attachments([
            "SCHOOLBILL.PDF",
            "my_Enrollment.jpg",
            "notes.txt",
        ]);
        assert!((scorer.completeness(&app) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(scorer.missing_documents(&app), vec!["income"]);

        let empty = education(dec!(5000), Priority::Medium);
        assert_eq!(scorer.completeness(&empty), 0.0);
    }

    #[test]
    fn test_priority_adjustment() {
        let scorer = RiskScorer::default();
        let partial = |priority| {
            education(dec!(5000), priority).with_attachments(["schoolbill.pdf", "enrollment.pdf"])
        };

        assert_eq!(scorer.score(&partial(Priority::Medium)).score, 15);
        assert_eq!(scorer.score(&partial(Priority::Low)).score, 25);
        // 15 - 20 clamps to zero
        assert_eq!(scorer.score(&partial(Priority::High)).score, 0);
    }

    #[test]
    fn test_fraud_signal_adds_score_and_factors() {
        let scorer = RiskScorer::new(
            RiskConfig::default(),
            FraudDetector::new(Arc::new(AlwaysSuspicious)),
        );
        let result = scorer.score(&complete_education(dec!(5000), Priority::Medium));

        assert!(result.fraud.is_suspicious);
        assert_eq!(result.score, 75);
        assert_eq!(result.level, RiskLevel::High);
        assert_eq!(
            result.factors,
            vec![
                "document information inconsistent",
                "abnormal application pattern",
                "adverse credit history: loan default"
            ]
        );
        assert_eq!(result.recommendations, vec!["recommend on-site verification"]);
    }

    #[test]
    fn test_score_is_clamped() {
        let scorer = RiskScorer::new(
            RiskConfig::default(),
            FraudDetector::new(Arc::new(AlwaysSuspicious)),
        );
        let worst = education(dec!(90000), Priority::Low).with_same_type_count(5);

        let result = scorer.score(&worst);
        // 30 + 25 + 30 + 75 + 10 = 170
        assert_eq!(result.score, 100);
        assert_eq!(result.level, RiskLevel::High);
    }

    #[test]
    fn test_factor_order_follows_steps() {
        let scorer = RiskScorer::default();
        let app = education(dec!(25000), Priority::Medium)
            .with_same_type_count(1)
            .with_attachment("schoolbill.pdf");

        let result = scorer.score(&app);
        assert_eq!(
            result.factors,
            vec![
                "amount exceeds maximum limit",
                "monthly application count exceeded",
                "critical materials missing"
            ]
        );
        assert_eq!(result.score, 85);
    }

    #[test]
    fn test_stub_fraud_source_is_default() {
        let scorer = RiskScorer::default();
        assert_eq!(scorer.fraud_detector().source_name(), NoFraudSignals.name());
    }

    #[test]
    fn test_normalize_attachment() {
        assert_eq!(normalize_attachment(" Income.PDF "), "income");
        assert_eq!(normalize_attachment("photo.jpg"), "photo");
        assert_eq!(normalize_attachment("scan.png"), "scan.png");
    }
}
