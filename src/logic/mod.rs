//! Logic Module - URL judgment engines
//!
//! - `features/` - live signals (TLS, DNS, threat list) into a feature vector
//! - `external_intel/` - Safe Browsing lookups
//! - `dataset/` - the labeled CSV store
//! - `model/` - classifier contract, random forest, adapter
//! - `judgment/` - the classify / correct / retrain loop
//! - `console` - interactive surface

pub mod config;
pub mod threat;
pub mod features;
pub mod external_intel;
pub mod dataset;
pub mod model;
pub mod judgment;
pub mod console;
