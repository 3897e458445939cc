//! Threat Types
//!
//! The closed label set. No classifier encoding lives here; the model
//! adapter owns the label ↔ index mapping.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Verdict for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Malicious,
    Safe,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Malicious, Label::Safe];

    /// Exact dataset spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Safe => "Safe",
            Label::Malicious => "Malicious",
        }
    }

    /// Fail-closed default for URLs the system cannot judge yet
    pub fn fail_closed() -> Self {
        Label::Malicious
    }

    /// Strict parse used for dataset cells
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "Safe" => Some(Label::Safe),
            "Malicious" => Some(Label::Malicious),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a label (expected Safe or Malicious)")]
pub struct ParseLabelError(pub String);

/// Lenient parse for operator input (case-insensitive, trimmed)
impl FromStr for Label {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Label::Safe),
            "malicious" => Ok(Label::Malicious),
            _ => Err(ParseLabelError(s.trim().to_string())),
        }
    }
}
