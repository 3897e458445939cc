//! Configuration module

use std::path::PathBuf;
use std::time::Duration;

use crate::constants;
use crate::logic::features::FeatureSchema;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dataset CSV location
    pub dataset_path: PathBuf,

    /// Active feature schema
    pub schema: FeatureSchema,

    /// Safe Browsing API key (three-signal schema only)
    pub safe_browsing_key: Option<String>,

    /// Safe Browsing lookup endpoint
    pub safe_browsing_endpoint: String,

    pub tls_timeout: Duration,
    pub dns_timeout: Duration,
    pub lookup_timeout: Duration,

    /// Trees in the ensemble
    pub tree_count: usize,

    /// Seed for the split and bootstrap sampling
    pub seed: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let safe_browsing_key = constants::get_safe_browsing_key();
        let schema = resolve_schema(constants::get_schema_override(), safe_browsing_key.is_some());

        Self {
            dataset_path: PathBuf::from(constants::get_dataset_path()),
            schema,
            safe_browsing_key,
            safe_browsing_endpoint: constants::get_safe_browsing_endpoint(),
            tls_timeout: constants::get_tls_timeout(),
            dns_timeout: constants::get_dns_timeout(),
            lookup_timeout: constants::get_lookup_timeout(),
            tree_count: constants::get_tree_count(),
            seed: constants::get_seed(),
        }
    }
}

/// Pick the schema: explicit override wins, otherwise three signals when a
/// lookup key is available.
fn resolve_schema(requested: Option<usize>, has_key: bool) -> FeatureSchema {
    match requested.and_then(FeatureSchema::from_signal_count) {
        Some(schema) => {
            if schema == FeatureSchema::ThreeSignal && !has_key {
                log::warn!(
                    "Three-signal schema requested without SAFE_BROWSING_API_KEY; \
                     google_safe_browsing will always be 0"
                );
            }
            schema
        }
        None => {
            if let Some(n) = requested {
                log::warn!("Unsupported PHISHEYE_SCHEMA={}, falling back to default", n);
            }
            if has_key {
                FeatureSchema::ThreeSignal
            } else {
                FeatureSchema::TwoSignal
            }
        }
    }
}
