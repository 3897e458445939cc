//! Judgment Types

use serde::Serialize;
use thiserror::Error;

use crate::logic::dataset::DatasetError;
use crate::logic::features::{FeatureVector, SchemaMismatchError};
use crate::logic::model::{ClassifierError, ClassifierState};
use crate::logic::threat::Label;

/// Where a recorded label came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelSource {
    /// Trained model output
    Predicted,
    /// No model yet; the Malicious default
    FailClosed,
    /// Operator supplied the label
    Operator,
}

impl std::fmt::Display for LabelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            LabelSource::Predicted => "predicted",
            LabelSource::FailClosed => "no model yet, fail-closed",
            LabelSource::Operator => "operator",
        };
        f.write_str(text)
    }
}

/// One URL judged and appended to the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Judgment {
    pub url: String,
    pub features: FeatureVector,
    pub label: Label,
    pub source: LabelSource,
    /// URL was already in the dataset before this judgment
    pub previously_seen: bool,
}

impl std::fmt::Display for Judgment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({}) features {}", self.url, self.label, self.source, self.features)?;
        if self.previously_seen {
            write!(f, " [seen before]")?;
        }
        Ok(())
    }
}

/// Per-URL failure; the batch carries on
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("probe and dataset disagree on the feature schema: {0}")]
    ProbeSchema(#[from] SchemaMismatchError),
}

#[derive(Debug)]
pub enum UrlOutcome {
    Judged(Judgment),
    Failed { url: String, error: JudgeError },
}

impl UrlOutcome {
    pub fn url(&self) -> &str {
        match self {
            UrlOutcome::Judged(judgment) => &judgment.url,
            UrlOutcome::Failed { url, .. } => url,
        }
    }

    pub fn judgment(&self) -> Option<&Judgment> {
        match self {
            UrlOutcome::Judged(judgment) => Some(judgment),
            UrlOutcome::Failed { .. } => None,
        }
    }
}

/// Result of the retrain that closes every batch
#[derive(Debug)]
pub enum RetrainOutcome {
    Trained(ClassifierState),
    /// Previous model (or none) stays active
    Failed(JudgeError),
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<UrlOutcome>,
    pub retrain: RetrainOutcome,
}

impl BatchReport {
    pub fn judged(&self) -> impl Iterator<Item = &Judgment> {
        self.outcomes.iter().filter_map(UrlOutcome::judgment)
    }

    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.judgment().is_none()).count()
    }
}
