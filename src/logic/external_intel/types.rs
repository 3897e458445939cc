//! External Intelligence Types
//!
//! Wire types for the Safe Browsing v4 `threatMatches:find` call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// REQUEST
// ============================================================================

/// Threat categories every lookup asks about
pub const THREAT_TYPES: &[ThreatType] = &[
    ThreatType::Malware,
    ThreatType::SocialEngineering,
    ThreatType::UnwantedSoftware,
    ThreatType::PotentiallyHarmfulApplication,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatType {
    Malware,
    SocialEngineering,
    UnwantedSoftware,
    PotentiallyHarmfulApplication,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformType {
    AnyPlatform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatEntryType {
    Url,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_id: String,
    pub client_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatEntry {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatInfo {
    pub threat_types: Vec<ThreatType>,
    pub platform_types: Vec<PlatformType>,
    pub threat_entry_types: Vec<ThreatEntryType>,
    pub threat_entries: Vec<ThreatEntry>,
}

/// Body of a `threatMatches:find` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindThreatMatchesRequest {
    pub client: ClientInfo,
    pub threat_info: ThreatInfo,
}

impl FindThreatMatchesRequest {
    /// Single-URL lookup across every category and platform
    pub fn for_url(client_id: &str, client_version: &str, url: &str) -> Self {
        Self {
            client: ClientInfo {
                client_id: client_id.to_string(),
                client_version: client_version.to_string(),
            },
            threat_info: ThreatInfo {
                threat_types: THREAT_TYPES.to_vec(),
                platform_types: vec![PlatformType::AnyPlatform],
                threat_entry_types: vec![ThreatEntryType::Url],
                threat_entries: vec![ThreatEntry { url: url.to_string() }],
            },
        }
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Response body; an empty object means no matches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindThreatMatchesResponse {
    #[serde(default)]
    pub matches: Vec<ThreatMatch>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatMatch {
    pub threat_type: String,
    #[serde(default)]
    pub platform_type: Option<String>,
    #[serde(default)]
    pub threat: Option<ThreatEntry>,
    /// e.g. "300s"
    #[serde(default)]
    pub cache_duration: Option<String>,
}

impl FindThreatMatchesResponse {
    pub fn is_listed(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Shortest cache duration the service asked for, in seconds
    pub fn cache_seconds(&self) -> Option<i64> {
        self.matches
            .iter()
            .filter_map(|m| m.cache_duration.as_deref())
            .filter_map(parse_duration_secs)
            .min()
    }
}

/// Parse "300s" / "12.5s" into whole seconds
pub fn parse_duration_secs(raw: &str) -> Option<i64> {
    let secs: f64 = raw.trim().strip_suffix('s')?.parse().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        Some(secs as i64)
    } else {
        None
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Threat-list lookup failure (the probe maps every variant to 0)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Safe Browsing API key not configured")]
    NotConfigured,

    #[error("lookup returned HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Transport(String),

    #[error("parse error: {0}")]
    Parse(String),
}
