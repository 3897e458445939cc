//! Model Module - Supervised classifier behind a fit/predict contract
//!
//! The adapter is the only thing the judgment loop talks to; the forest can
//! be swapped for any other `Classifier`.

pub mod types;
pub mod tree;
pub mod forest;
pub mod split;
pub mod metrics;
pub mod adapter;


// Re-export common types
pub use types::{Classifier, ClassifierError, ClassifierState, LabelMetrics, TrainingReport};
pub use forest::RandomForest;
pub use adapter::ClassifierAdapter;
