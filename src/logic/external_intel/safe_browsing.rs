//! Safe Browsing Integration
//!
//! Blocking `threatMatches:find` lookups for the `google_safe_browsing`
//! signal, with a small local cache to avoid re-asking for URLs judged
//! in the same session.

use std::collections::HashMap;
use std::time::Duration;
use parking_lot::Mutex;

use crate::constants;
use super::types::{FindThreatMatchesRequest, FindThreatMatchesResponse, LookupError};

// ============================================================================
// CONSTANTS
// ============================================================================

const CACHE_MAX_SIZE: usize = 1000;
const DEFAULT_CACHE_TTL_SECS: i64 = 30 * 60;

// ============================================================================
// CLIENT
// ============================================================================

pub struct SafeBrowsingClient {
    api_key: String,
    endpoint: String,
    client_id: String,
    client_version: String,
    timeout: Duration,
    cache: Mutex<HashMap<String, CachedVerdict>>,
}

#[derive(Debug, Clone, Copy)]
struct CachedVerdict {
    listed: bool,
    cached_at: i64,
    expires_at: i64,
}

impl SafeBrowsingClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            endpoint: constants::DEFAULT_SAFE_BROWSING_ENDPOINT.to_string(),
            client_id: constants::SAFE_BROWSING_CLIENT_ID.to_string(),
            client_version: constants::APP_VERSION.to_string(),
            timeout: Duration::from_secs(constants::DEFAULT_LOOKUP_TIMEOUT_SECS),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if client is configured
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Ask the service whether `url` is listed (blocking)
    pub fn lookup(&self, url: &str) -> Result<bool, LookupError> {
        if !self.is_configured() {
            return Err(LookupError::NotConfigured);
        }

        let key = url.trim();
        if let Some(listed) = self.get_cached(key) {
            return Ok(listed);
        }

        let request = FindThreatMatchesRequest::for_url(&self.client_id, &self.client_version, key);
        let body = serde_json::to_string(&request)
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        let response = ureq::post(&self.endpoint)
            .query("key", &self.api_key)
            .set("Content-Type", "application/json")
            .timeout(self.timeout)
            .send_string(&body);

        match response {
            Ok(resp) => {
                if resp.status() != 200 {
                    return Err(LookupError::Status(resp.status()));
                }

                let text = resp.into_string()
                    .map_err(|e| LookupError::Transport(e.to_string()))?;
                let parsed = parse_response(&text)?;
                let listed = parsed.is_listed();

                let ttl = parsed.cache_seconds().unwrap_or(DEFAULT_CACHE_TTL_SECS);
                self.cache_verdict(key, listed, ttl);

                Ok(listed)
            }
            Err(ureq::Error::Status(code, _)) => Err(LookupError::Status(code)),
            Err(e) => Err(LookupError::Transport(e.to_string())),
        }
    }

    /// Signal value for `google_safe_browsing` (never fails)
    pub fn threat_listed(&self, url: &str) -> f32 {
        match self.lookup(url) {
            Ok(true) => 1.0,
            Ok(false) => 0.0,
            Err(e) => {
                log::debug!("google_safe_browsing({}) -> 0: {}", url, e);
                0.0
            }
        }
    }

    /// Get cache stats (entries, capacity)
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache.lock().len(), CACHE_MAX_SIZE)
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    fn get_cached(&self, url: &str) -> Option<bool> {
        let cache = self.cache.lock();
        let cached = cache.get(url)?;

        if chrono::Utc::now().timestamp() < cached.expires_at {
            Some(cached.listed)
        } else {
            None
        }
    }

    fn cache_verdict(&self, url: &str, listed: bool, ttl_secs: i64) {
        let mut cache = self.cache.lock();

        // Evict oldest tenth when full
        if cache.len() >= CACHE_MAX_SIZE {
            let mut entries: Vec<_> = cache.iter()
                .map(|(k, v)| (k.clone(), v.cached_at))
                .collect();
            entries.sort_by(|a, b| a.1.cmp(&b.1));

            for (key, _) in entries.into_iter().take(CACHE_MAX_SIZE / 10) {
                cache.remove(&key);
            }
        }

        let now = chrono::Utc::now().timestamp();
        cache.insert(url.to_string(), CachedVerdict {
            listed,
            cached_at: now,
            expires_at: now.saturating_add(ttl_secs),
        });
    }
}

// ============================================================================
// PARSE RESPONSE
// ============================================================================

fn parse_response(body: &str) -> Result<FindThreatMatchesResponse, LookupError> {
    if body.trim().is_empty() {
        return Ok(FindThreatMatchesResponse::default());
    }
    serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
