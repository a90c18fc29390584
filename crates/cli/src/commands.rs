//! CLI commands

use agrisub_guard::{
    check_password_strength, Clock, GuardStats, LoginAttempt, LoginDecision, LoginGuard,
    LoginGuardConfig, LoginGuardStore, ManualClock, PasswordStrength,
};
use agrisub_risk::{Recommendation, RiskAssessment, RiskConfig, ReviewSummary, ReviewVerdict};
use anyhow::Context;
use chrono::Utc;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::context::{load_applications, ReviewContext};

/// Evaluate every application in `file` and print verdicts plus a summary
pub fn review<W: Write>(
    ctx: &ReviewContext,
    file: &Path,
    as_json: bool,
    out: &mut W,
) -> anyhow::Result<ReviewSummary> {
    let applications = load_applications(file)?;
    let verdicts = ctx.reviewer().evaluate_batch(&applications);
    let summary = ReviewSummary::from_verdicts(&verdicts);

    if as_json {
        let report = json!({
            "verdicts": verdicts,
            "summary": summary,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(summary);
    }

    for verdict in &verdicts {
        print_verdict(verdict, out)?;
    }
    writeln!(
        out,
        "📊 {} reviewed: {} approve, {} reject, {} manual review (mean score {:.1})",
        summary.total, summary.approved, summary.rejected, summary.manual_review, summary.mean_score
    )?;
    if ctx.history_len() > 0 {
        writeln!(out, "   compared against {} historical cases", ctx.history_len())?;
    }
    Ok(summary)
}

fn print_verdict<W: Write>(verdict: &ReviewVerdict, out: &mut W) -> anyhow::Result<()> {
    let icon = match verdict.recommendation {
        Recommendation::Approve => "✅",
        Recommendation::Reject => "❌",
        Recommendation::ManualReview => "🔍",
    };
    writeln!(
        out,
        "{} {} {} (confidence {:.2})",
        icon,
        verdict.application_id,
        verdict.recommendation.as_str(),
        verdict.confidence
    )?;
    writeln!(
        out,
        "   risk: {} ({})",
        verdict.assessment.score,
        verdict.assessment.level.as_str()
    )?;
    for reason in &verdict.reasons {
        writeln!(out, "   - {}", reason)?;
    }
    if let Some(amount) = verdict.suggested_amount {
        writeln!(out, "   suggested amount: {}", amount)?;
    }
    writeln!(
        out,
        "   estimated processing: {} day(s)",
        verdict.processing_time_estimate_days
    )?;
    Ok(())
}

/// Print the risk assessment for every application in `file`
pub fn score<W: Write>(
    ctx: &ReviewContext,
    file: &Path,
    out: &mut W,
) -> anyhow::Result<Vec<RiskAssessment>> {
    let applications = load_applications(file)?;
    let mut assessments = Vec::with_capacity(applications.len());

    for application in &applications {
        let assessment = ctx.scorer().score(application);
        writeln!(
            out,
            "{}: {} ({}), completeness {:.0}%",
            application.id,
            assessment.score,
            assessment.level.as_str(),
            assessment.completeness * 100.0
        )?;
        for factor in &assessment.factors {
            writeln!(out, "   factor: {}", factor)?;
        }
        for recommendation in &assessment.recommendations {
            writeln!(out, "   action: {}", recommendation)?;
        }
        if assessment.fraud.is_suspicious {
            writeln!(out, "   ⚠️  fraud score {}", assessment.fraud.score)?;
        }
        assessments.push(assessment);
    }
    Ok(assessments)
}

/// Print a password strength report
pub fn password<W: Write>(password: &str, out: &mut W) -> anyhow::Result<PasswordStrength> {
    let strength = check_password_strength(password);

    writeln!(out, "Strength: {} ({}/100)", strength.level(), strength.score)?;
    for hint in &strength.feedback {
        writeln!(out, "   - {}", hint)?;
    }
    Ok(strength)
}

/// Print the default risk or guard configuration as JSON
pub fn config<W: Write>(guard: bool, out: &mut W) -> anyhow::Result<()> {
    let rendered = if guard {
        serde_json::to_string_pretty(&LoginGuardConfig::default())?
    } else {
        serde_json::to_string_pretty(&RiskConfig::default())?
    };
    writeln!(out, "{}", rendered)?;
    Ok(())
}

/// Replay a recorded attempt log through a fresh guard
///
/// Each attempt is checked first; only allowed attempts reach credential
/// verification and get recorded with their logged outcome.
pub fn login_replay<W: Write>(
    file: &Path,
    config: Option<&Path>,
    out: &mut W,
) -> anyhow::Result<(Vec<LoginDecision>, GuardStats)> {
    let config = match config {
        Some(path) => LoginGuardConfig::from_file(path)
            .with_context(|| format!("loading guard config from {}", path.display()))?,
        None => LoginGuardConfig::default(),
    };

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let mut attempts: Vec<LoginAttempt> = serde_json::from_str(&content)
        .with_context(|| format!("parsing attempt log in {}", file.display()))?;
    attempts.sort_by_key(|a| a.timestamp);

    let start = attempts.first().map(|a| a.timestamp).unwrap_or_else(Utc::now);
    let clock = Arc::new(ManualClock::new(start));
    let guard = LoginGuard::new(config, Arc::new(LoginGuardStore::new()), clock.clone());

    let mut decisions = Vec::with_capacity(attempts.len());
    for attempt in &attempts {
        clock.set(attempt.timestamp);
        let decision = guard.check_login_allowed(&attempt.username, &attempt.address);

        match decision.reason {
            None => {
                guard.record_attempt(&attempt.username, &attempt.address, attempt.success);
                let outcome = if attempt.success { "ok" } else { "failed" };
                writeln!(
                    out,
                    "{} {}@{} allowed, credentials {}",
                    clock.now().to_rfc3339(),
                    attempt.username,
                    attempt.address,
                    outcome
                )?;
            }
            Some(reason) => {
                writeln!(
                    out,
                    "{} {}@{} denied: {} ({}s remaining)",
                    clock.now().to_rfc3339(),
                    attempt.username,
                    attempt.address,
                    reason,
                    decision.lockout_remaining_seconds.unwrap_or(0)
                )?;
            }
        }
        decisions.push(decision);
    }

    let stats = guard.stats();
    writeln!(
        out,
        "📊 {} attempts replayed, {} accounts locked, {} addresses locked",
        attempts.len(),
        stats.locked_accounts,
        stats.locked_addresses
    )?;
    Ok((decisions, stats))
}
