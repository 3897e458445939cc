//! Judgment Module - the closed classify / correct / retrain loop

pub mod types;
pub mod operator;
pub mod engine;

#[cfg(test)]
mod tests;

pub use types::{BatchReport, JudgeError, Judgment, LabelSource, RetrainOutcome, UrlOutcome};
pub use operator::{Operator, Unattended};
pub use engine::JudgmentLoop;
