//! Review context - wires config, fraud signals and case history together

use agrisub_core::Application;
use agrisub_risk::{
    AutoReviewer, CaseHistory, DeclaredDetailsSignals, FraudDetector, NoSimilarCases,
    RiskConfig, RiskScorer, SimilarCaseLookup,
};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Everything a review command needs
pub struct ReviewContext {
    reviewer: AutoReviewer,
    history_len: usize,
}

impl ReviewContext {
    /// Build from optional config and history files
    ///
    /// Without a config file the built-in defaults apply; without a history
    /// file no similar cases are ever found.
    pub fn new(config: Option<&Path>, history: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => RiskConfig::from_file(path)
                .with_context(|| format!("loading risk config from {}", path.display()))?,
            None => RiskConfig::default(),
        };

        let (cases, history_len): (Arc<dyn SimilarCaseLookup>, usize) = match history {
            Some(path) => {
                let history = CaseHistory::from_file(path, config.similar_case_tolerance)
                    .with_context(|| format!("loading case history from {}", path.display()))?;
                let len = history.len();
                tracing::info!(path = %path.display(), cases = len, "Case history loaded");
                (Arc::new(history), len)
            }
            None => (Arc::new(NoSimilarCases), 0),
        };

        let fraud = FraudDetector::new(Arc::new(DeclaredDetailsSignals::new(
            config.abnormal_pattern_count,
        )));
        let reviewer = AutoReviewer::new(RiskScorer::new(config, fraud), cases);

        Ok(Self {
            reviewer,
            history_len,
        })
    }

    pub fn reviewer(&self) -> &AutoReviewer {
        &self.reviewer
    }

    pub fn scorer(&self) -> &RiskScorer {
        self.reviewer.scorer()
    }

    /// Number of historical cases loaded
    pub fn history_len(&self) -> usize {
        self.history_len
    }
}

/// Read a JSON file holding one application or an array of them
pub fn load_applications(path: &Path) -> anyhow::Result<Vec<Application>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        serde_json::from_str(&content)
            .with_context(|| format!("parsing applications in {}", path.display()))
    } else {
        let application: Application = serde_json::from_str(&content)
            .with_context(|| format!("parsing application in {}", path.display()))?;
        Ok(vec![application])
    }
}
