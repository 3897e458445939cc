//! Model Types
//!
//! The classifier contract, the trained-state snapshot and the evaluation
//! report. Algorithms live in `tree` / `forest`; the label encoding lives
//! in the adapter.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::logic::features::{FeatureSchema, SchemaMismatchError};
use crate::logic::threat::Label;

// ============================================================================
// CLASSIFIER CONTRACT
// ============================================================================

/// Black-box supervised classifier over encoded targets.
///
/// `fit` replaces whatever the model learned before. `predict` returns a
/// target index below the `classes` count passed to the last `fit`.
pub trait Classifier {
    fn fit(&mut self, features: &[Vec<f32>], targets: &[usize], classes: usize);
    fn predict(&self, features: &[f32]) -> usize;
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("no trainable rows in the dataset ({dropped} malformed rows dropped)")]
    EmptyDataset { dropped: usize },

    #[error("classifier has not been trained yet")]
    NotTrained,

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    #[error("classifier returned class {0} outside the trained label space")]
    UnknownClass(usize),
}

// ============================================================================
// REPORT
// ============================================================================

/// Per-label evaluation metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Outcome of one fit + held-out evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub accuracy: f64,
    pub per_label: Vec<LabelMetrics>,
    pub train_rows: usize,
    pub eval_rows: usize,
    pub dropped_rows: usize,
    /// Too few rows to hold any out; metrics are on the training rows
    pub evaluated_on_training_rows: bool,
}

impl std::fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for m in &self.per_label {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{:>12} {:>29.2} {:>9}", "accuracy", self.accuracy, self.eval_rows)?;
        write!(
            f,
            "trained on {} rows, evaluated on {} rows, {} malformed rows dropped",
            self.train_rows, self.eval_rows, self.dropped_rows
        )?;
        if self.evaluated_on_training_rows {
            write!(f, " (too few rows to hold out; evaluated on training rows)")?;
        }
        Ok(())
    }
}

// ============================================================================
// STATE
// ============================================================================

/// What the active model was trained on
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierState {
    pub feature_schema: FeatureSchema,
    pub layout_hash: u32,
    /// Distinct labels seen at training, sorted; index = encoded target
    pub label_space: Vec<Label>,
    pub trained_at: DateTime<Utc>,
    pub report: TrainingReport,
}

impl ClassifierState {
    pub fn encode(&self, label: Label) -> Option<usize> {
        self.label_space.binary_search(&label).ok()
    }

    pub fn decode(&self, index: usize) -> Option<Label> {
        self.label_space.get(index).copied()
    }
}
