//! Host extraction shared by the network signals

use url::{Host, Url};
use super::probe::ProbeError;

/// Extract the host a probe should contact.
///
/// Scheme-less input (`example.com`, `bad-url`) has no parseable host and
/// is rejected without touching the network.
pub fn parse_host(raw: &str) -> Result<String, ProbeError> {
    let parsed = Url::parse(raw.trim()).map_err(|_| ProbeError::NoHost(raw.to_string()))?;

    match parsed.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => Ok(domain.to_string()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        _ => Err(ProbeError::NoHost(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host() {
        assert_eq!(parse_host("https://example.com/path?q=1").unwrap(), "example.com");
        assert_eq!(parse_host("  http://Sub.Example.org:8080/  ").unwrap(), "sub.example.org");
        assert_eq!(parse_host("https://127.0.0.1/").unwrap(), "127.0.0.1");
        assert_eq!(parse_host("https://[::1]:443/").unwrap(), "::1");
    }

    #[test]
    fn test_parse_host_rejects_hostless() {
        assert!(parse_host("bad-url").is_err());
        assert!(parse_host("example.com").is_err());
        assert!(parse_host("mailto:someone@example.com").is_err());
        assert!(parse_host("").is_err());
    }
}
