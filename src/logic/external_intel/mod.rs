//! External Intelligence Module - Threat-list lookups
//!
//! # Components
//! - `safe_browsing.rs`: Safe Browsing v4 client (blocking, cached)
//! - `types.rs`: request/response wire types and `LookupError`

pub mod safe_browsing;
pub mod types;

pub use safe_browsing::SafeBrowsingClient;
pub use types::{FindThreatMatchesRequest, FindThreatMatchesResponse, LookupError, ThreatType, THREAT_TYPES};
