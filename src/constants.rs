//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden from the environment (or a `.env` file).

use std::time::Duration;

/// Default dataset location (relative to the working directory)
pub const DEFAULT_DATASET_PATH: &str = "url_dataset.csv";

/// Safe Browsing v4 lookup endpoint
pub const DEFAULT_SAFE_BROWSING_ENDPOINT: &str =
    "https://safebrowsing.googleapis.com/v4/threatMatches:find";

/// Client identity sent with every threat-list lookup
pub const SAFE_BROWSING_CLIENT_ID: &str = "phisheye";

/// TLS connect / handshake timeout (seconds)
pub const DEFAULT_TLS_TIMEOUT_SECS: u64 = 3;

/// DNS resolution timeout (seconds)
pub const DEFAULT_DNS_TIMEOUT_SECS: u64 = 3;

/// Threat-list lookup timeout (seconds)
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;

/// Trees in the ensemble
pub const DEFAULT_TREE_COUNT: usize = 100;

/// Seed for bootstrap sampling and the train/eval split
pub const DEFAULT_SEED: u64 = 42;

/// Share of cleaned rows held out for evaluation (percent, rounded up)
pub const EVAL_PERCENT: usize = 20;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Phisheye";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get dataset path from environment or use default
pub fn get_dataset_path() -> String {
    std::env::var("PHISHEYE_DATASET")
        .unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string())
}

/// Get Safe Browsing API key (None when unset or blank)
pub fn get_safe_browsing_key() -> Option<String> {
    std::env::var("SAFE_BROWSING_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// Get Safe Browsing endpoint from environment or use default
pub fn get_safe_browsing_endpoint() -> String {
    std::env::var("SAFE_BROWSING_ENDPOINT")
        .unwrap_or_else(|_| DEFAULT_SAFE_BROWSING_ENDPOINT.to_string())
}

/// Get requested signal count ("2" or "3"), if any
pub fn get_schema_override() -> Option<usize> {
    std::env::var("PHISHEYE_SCHEMA")
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

pub fn get_tls_timeout() -> Duration {
    Duration::from_secs(env_u64("PHISHEYE_TLS_TIMEOUT_SECS", DEFAULT_TLS_TIMEOUT_SECS))
}

pub fn get_dns_timeout() -> Duration {
    Duration::from_secs(env_u64("PHISHEYE_DNS_TIMEOUT_SECS", DEFAULT_DNS_TIMEOUT_SECS))
}

pub fn get_lookup_timeout() -> Duration {
    Duration::from_secs(env_u64("PHISHEYE_LOOKUP_TIMEOUT_SECS", DEFAULT_LOOKUP_TIMEOUT_SECS))
}

/// Get ensemble size from environment or use default
pub fn get_tree_count() -> usize {
    std::env::var("PHISHEYE_TREES")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|n: &usize| *n > 0)
        .unwrap_or(DEFAULT_TREE_COUNT)
}

/// Get training seed from environment or use default
pub fn get_seed() -> u64 {
    env_u64("PHISHEYE_SEED", DEFAULT_SEED)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
