//! Feature Vector - Core data structure for classifier input
//!
//! Schema-tagged ordered tuple of signal values. Probes only emit 0/1;
//! values read back from disk may be any finite number.

use serde::{Deserialize, Serialize};
use super::layout::{validate_layout, FeatureSchema, SchemaMismatchError, Signal};

/// Schema-tagged feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Zeroed vector: every signal degraded
    pub fn zeroed(schema: FeatureSchema) -> Self {
        Self {
            schema,
            values: vec![0.0; schema.arity()],
        }
    }

    /// Build from raw values; the value count must match the schema
    pub fn from_values(schema: FeatureSchema, values: Vec<f32>) -> Result<Self, SchemaMismatchError> {
        validate_layout(schema, schema, values.len())?;
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a signal value (None if the schema lacks that signal)
    pub fn get(&self, signal: Signal) -> Option<f32> {
        self.schema
            .signal_index(signal.column())
            .and_then(|i| self.values.get(i).copied())
    }

    /// Set a signal value; ignored when the schema lacks the signal
    pub fn set(&mut self, signal: Signal, value: f32) {
        if let Some(i) = self.schema.signal_index(signal.column()) {
            self.values[i] = value;
        }
    }

    /// Check this vector against the schema a consumer expects
    pub fn validate(&self, expected: FeatureSchema) -> Result<(), SchemaMismatchError> {
        validate_layout(expected, self.schema, self.values.len())
    }
}

impl std::fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.values.iter().map(|v| format!("{}", v)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_vector() {
        let v = FeatureVector::zeroed(FeatureSchema::ThreeSignal);
        assert_eq!(v.as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(v.to_string(), "[0, 0, 0]");
    }

    #[test]
    fn test_from_values_checks_arity() {
        assert!(FeatureVector::from_values(FeatureSchema::TwoSignal, vec![1.0, 0.0]).is_ok());
        assert!(FeatureVector::from_values(FeatureSchema::TwoSignal, vec![1.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_get_set_by_signal() {
        let mut v = FeatureVector::zeroed(FeatureSchema::TwoSignal);
        v.set(Signal::DnsOk, 1.0);
        v.set(Signal::ThreatListed, 1.0); // not part of this schema

        assert_eq!(v.get(Signal::DnsOk), Some(1.0));
        assert_eq!(v.get(Signal::SslValid), Some(0.0));
        assert_eq!(v.get(Signal::ThreatListed), None);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_validate_against_other_schema() {
        let v = FeatureVector::zeroed(FeatureSchema::ThreeSignal);
        assert!(v.validate(FeatureSchema::ThreeSignal).is_ok());
        assert!(v.validate(FeatureSchema::TwoSignal).is_err());
    }
}
