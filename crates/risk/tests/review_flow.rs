//! Integration tests for scoring + fraud + auto-review

use std::sync::Arc;

use agrisub_core::{Application, ApplicationType, Priority};
use agrisub_risk::{
    AutoReviewer, DeclaredDetailsSignals, FraudDetector, NoSimilarCases, Recommendation,
    RiskConfig, RiskLevel, RiskScorer,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reviewer_with_declared_details() -> AutoReviewer {
    let config = RiskConfig::default();
    let signals = DeclaredDetailsSignals::new(config.abnormal_pattern_count);
    AutoReviewer::new(
        RiskScorer::new(config, FraudDetector::new(Arc::new(signals))),
        Arc::new(NoSimilarCases),
    )
}

#[test]
fn test_education_over_limit_scenario() {
    let app = Application::new("FAM-010", ApplicationType::Education, dec!(25000), Priority::High)
        .unwrap()
        .with_attachment("schoolbill.pdf");

    let verdict = AutoReviewer::default().evaluate(&app);

    // +30 amount, +30 completeness, -20 priority
    assert_eq!(verdict.assessment.score, 40);
    assert_eq!(verdict.assessment.level, RiskLevel::Medium);
    assert_eq!(
        verdict.assessment.factors,
        vec!["amount exceeds maximum limit", "critical materials missing"]
    );
    assert_eq!(verdict.recommendation, Recommendation::ManualReview);
    assert_eq!(verdict.confidence, 0.5);
    assert_eq!(verdict.suggested_amount, Some(dec!(6000)));
    // 3 - 1 (high) + 2 (incomplete)
    assert_eq!(verdict.processing_time_estimate_days, 4);
}

#[test]
fn test_compliant_applications_are_low_risk() {
    let scorer = RiskScorer::default();
    let cases = [
        (ApplicationType::Education, dec!(1000), vec!["schoolbill.pdf", "enrollment.pdf", "income.pdf"]),
        (ApplicationType::Medical, dec!(50000), vec!["diagnosis.jpg", "invoice.jpg", "income.jpg"]),
        (ApplicationType::Housing, dec!(40000), vec!["property.pdf", "estimate.pdf", "income.pdf"]),
        (ApplicationType::Business, dec!(150000), vec!["license.pdf", "plan.pdf", "financial.pdf"]),
    ];

    for (kind, amount, docs) in cases {
        let app = Application::new("FAM-011", kind.clone(), amount, Priority::Medium)
            .unwrap()
            .with_attachments(docs);
        let result = scorer.score(&app);

        assert!(result.score <= 30, "{} scored {}", kind, result.score);
        assert_eq!(result.level, RiskLevel::Low);
    }
}

#[test]
fn test_score_and_confidence_stay_in_range() {
    let reviewer = reviewer_with_declared_details();
    let amounts = [dec!(1), dec!(999), dec!(5000), dec!(20001), dec!(1000000)];
    let priorities = [Priority::High, Priority::Medium, Priority::Low];
    let kinds = [
        ApplicationType::Education,
        ApplicationType::Medical,
        ApplicationType::Other,
        ApplicationType::Unrecognized("orchard".to_string()),
    ];

    for kind in &kinds {
        for amount in amounts {
            for priority in priorities {
                for count in [0, 1, 5] {
                    let app = Application::new("FAM-012", kind.clone(), amount, priority)
                        .unwrap()
                        .with_same_type_count(count)
                        .with_detail("credit_issues", "loan default")
                        .with_detail("declared_amount", "1");

                    let verdict = reviewer.evaluate(&app);
                    assert!(verdict.assessment.score <= 100);
                    assert!((0.0..=1.0).contains(&verdict.confidence));
                    assert!(verdict.processing_time_estimate_days >= 1);
                }
            }
        }
    }
}

#[test]
fn test_suspicious_is_always_manual_review() {
    let reviewer = reviewer_with_declared_details();

    for amount in [dec!(500), dec!(3000), dec!(90000)] {
        let app = Application::new("FAM-013", ApplicationType::Medical, amount, Priority::Medium)
            .unwrap()
            .with_attachments(["diagnosis.pdf", "invoice.pdf", "income.pdf"])
            .with_same_type_count(3)
            .with_detail("declared_amount", "12.50");

        let verdict = reviewer.evaluate(&app);

        assert!(verdict.assessment.fraud.is_suspicious);
        assert_eq!(verdict.recommendation, Recommendation::ManualReview);
        assert!(verdict.confidence >= 0.85);
        assert!(verdict
            .assessment
            .recommendations
            .contains(&"recommend on-site verification".to_string()));
    }
}

#[test]
fn test_medical_high_priority_suggested_amount() {
    let app = Application::new("FAM-014", ApplicationType::Medical, dec!(1200), Priority::High).unwrap();
    let verdict = AutoReviewer::default().evaluate(&app);

    assert_eq!(verdict.suggested_amount, Some(dec!(3600)));
}

#[test]
fn test_amount_over_max_adds_at_least_thirty() {
    let scorer = RiskScorer::default();
    let base = |amount: Decimal| {
        Application::new("FAM-015", ApplicationType::Housing, amount, Priority::Medium)
            .unwrap()
            .with_attachments(["property.pdf", "estimate.pdf", "income.pdf"])
    };

    let within = scorer.score(&base(dec!(100000)));
    let over = scorer.score(&base(dec!(100001)));

    assert!(over.score >= within.score + 30);
}

#[test]
fn test_application_from_json() {
    let json = r#"{
        "id": "APP-2024-0007",
        "applicant_id": "FAM-016",
        "type": "business",
        "amount": "12000",
        "priority": "low",
        "attachments": ["license.pdf", "plan.pdf", "financial.pdf"]
    }"#;
    let app: Application = serde_json::from_str(json).unwrap();
    let verdict = AutoReviewer::default().evaluate(&app);

    assert_eq!(verdict.application_id, "APP-2024-0007");
    assert_eq!(verdict.assessment.score, 10);
    assert_eq!(verdict.recommendation, Recommendation::Approve);
    assert_eq!(verdict.suggested_amount, Some(dec!(8000)));

    let out = serde_json::to_string(&verdict).unwrap();
    assert!(out.contains("\"recommendation\":\"approve\""));
}
