//! Feature Probe - live checks reduced to binary signals
//!
//! Every signal is computed independently. A failure inside one signal
//! degrades that signal to 0 and is only visible in debug logs; `extract`
//! itself cannot fail.

use std::time::Duration;
use thiserror::Error;

use crate::constants;
use crate::logic::config::AppConfig;
use crate::logic::external_intel::SafeBrowsingClient;
use super::layout::{FeatureSchema, Signal};
use super::vector::FeatureVector;
use super::{dns, tls};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure inside a single signal (recovered to 0 at the probe boundary)
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no parseable host in '{0}'")]
    NoHost(String),

    #[error("resolve failed: {0}")]
    Resolve(String),

    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },

    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("tls handshake failed: {0}")]
    Tls(String),
}

// ============================================================================
// PROBE CONTRACT
// ============================================================================

/// Turns a URL into a feature vector for one fixed schema
pub trait FeatureProbe {
    /// Schema of every vector this probe produces
    fn schema(&self) -> FeatureSchema;

    /// Run all checks; never fails
    fn extract(&self, url: &str) -> FeatureVector;
}

// ============================================================================
// NETWORK PROBE
// ============================================================================

/// Live probe: TLS handshake, DNS resolution, optional threat-list lookup
pub struct NetworkProbe {
    schema: FeatureSchema,
    tls_timeout: Duration,
    dns_timeout: Duration,
    threat_intel: Option<SafeBrowsingClient>,
}

impl NetworkProbe {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            tls_timeout: Duration::from_secs(constants::DEFAULT_TLS_TIMEOUT_SECS),
            dns_timeout: Duration::from_secs(constants::DEFAULT_DNS_TIMEOUT_SECS),
            threat_intel: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut probe = Self::new(config.schema).with_timeouts(config.tls_timeout, config.dns_timeout);

        if config.schema.signals().contains(&Signal::ThreatListed) {
            if let Some(key) = &config.safe_browsing_key {
                probe = probe.with_threat_intel(
                    SafeBrowsingClient::new(key)
                        .with_endpoint(&config.safe_browsing_endpoint)
                        .with_timeout(config.lookup_timeout),
                );
            }
        }

        probe
    }

    pub fn with_timeouts(mut self, tls_timeout: Duration, dns_timeout: Duration) -> Self {
        self.tls_timeout = tls_timeout;
        self.dns_timeout = dns_timeout;
        self
    }

    pub fn with_threat_intel(mut self, client: SafeBrowsingClient) -> Self {
        self.threat_intel = Some(client);
        self
    }

    fn threat_listed(&self, url: &str) -> f32 {
        match &self.threat_intel {
            Some(client) => client.threat_listed(url),
            None => {
                log::debug!("google_safe_browsing({}) -> 0: lookup not configured", url);
                0.0
            }
        }
    }
}

impl FeatureProbe for NetworkProbe {
    fn schema(&self) -> FeatureSchema {
        self.schema
    }

    fn extract(&self, url: &str) -> FeatureVector {
        let mut vector = FeatureVector::zeroed(self.schema);

        for signal in self.schema.signals() {
            let value = match signal {
                Signal::SslValid => tls::ssl_certificate_valid(url, self.tls_timeout),
                Signal::DnsOk => dns::dns_lookup(url, self.dns_timeout),
                Signal::ThreatListed => self.threat_listed(url),
            };
            vector.set(*signal, value);
        }

        log::debug!("Extracted {} for {}", vector, url);
        vector
    }
}
