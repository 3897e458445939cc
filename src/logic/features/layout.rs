//! Feature Layout - Centralized Signal Definition
//!
//! **This file controls the dataset columns and the classifier input order.**
//!
//! ## Rules:
//! 1. Add a signal → add a schema variant, never reorder an existing one
//! 2. Rename a column → increment LAYOUT_VERSION
//!
//! A model trained on one schema must never see vectors from another; the
//! layout hash is what the classifier state remembers to enforce that.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// LAYOUT VERSION
// ============================================================================

/// Current layout version (part of every schema hash)
pub const LAYOUT_VERSION: u8 = 1;

/// Column holding the URL
pub const URL_COLUMN: &str = "url";

/// Column holding the label
pub const LABEL_COLUMN: &str = "label";

// ============================================================================
// SIGNALS
// ============================================================================

/// One binary signal derived from a live check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    SslValid,
    DnsOk,
    ThreatListed,
}

impl Signal {
    /// Dataset column name
    pub fn column(&self) -> &'static str {
        match self {
            Signal::SslValid => "ssl_certificate_valid",
            Signal::DnsOk => "dns_lookup",
            Signal::ThreatListed => "google_safe_browsing",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

const TWO_SIGNALS: &[Signal] = &[Signal::SslValid, Signal::DnsOk];
const THREE_SIGNALS: &[Signal] = &[Signal::SslValid, Signal::DnsOk, Signal::ThreatListed];

// ============================================================================
// SCHEMA
// ============================================================================

/// Ordered set of signals a vector (and a model) is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureSchema {
    /// ssl_certificate_valid, dns_lookup
    TwoSignal,
    /// ssl_certificate_valid, dns_lookup, google_safe_browsing
    ThreeSignal,
}

impl FeatureSchema {
    /// Signals in vector order
    pub fn signals(&self) -> &'static [Signal] {
        match self {
            FeatureSchema::TwoSignal => TWO_SIGNALS,
            FeatureSchema::ThreeSignal => THREE_SIGNALS,
        }
    }

    pub fn arity(&self) -> usize {
        self.signals().len()
    }

    pub fn from_signal_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(FeatureSchema::TwoSignal),
            3 => Some(FeatureSchema::ThreeSignal),
            _ => None,
        }
    }

    /// Full dataset header: url, signals..., label
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(self.arity() + 2);
        columns.push(URL_COLUMN);
        columns.extend(self.signals().iter().map(|s| s.column()));
        columns.push(LABEL_COLUMN);
        columns
    }

    /// Index of a signal column within the vector
    pub fn signal_index(&self, column: &str) -> Option<usize> {
        self.signals().iter().position(|s| s.column() == column)
    }

    /// CRC32 over the layout version and the ordered column names
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[LAYOUT_VERSION]);

        for signal in self.signals() {
            hasher.update(signal.column().as_bytes());
            hasher.update(&[0]); // Separator
        }

        hasher.finalize()
    }
}

impl std::fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-signal [{}]", self.arity(), self.columns()[1..=self.arity()].join(", "))
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// A vector or record built on a different schema than expected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("feature schema mismatch: expected {expected_arity} signals (hash {expected_hash:08x}), got {actual_arity} signals (hash {actual_hash:08x})")]
pub struct SchemaMismatchError {
    pub expected_arity: usize,
    pub expected_hash: u32,
    pub actual_arity: usize,
    pub actual_hash: u32,
}

/// Validate that `actual` (schema + value count) matches `expected`
pub fn validate_layout(
    expected: FeatureSchema,
    actual: FeatureSchema,
    actual_len: usize,
) -> Result<(), SchemaMismatchError> {
    if expected != actual || actual_len != expected.arity() {
        return Err(SchemaMismatchError {
            expected_arity: expected.arity(),
            expected_hash: expected.layout_hash(),
            actual_arity: actual_len,
            actual_hash: actual.layout_hash(),
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
