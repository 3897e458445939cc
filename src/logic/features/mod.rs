//! Features Module - Feature Extraction Engine
//!
//! Turns a URL into a schema-tagged vector of binary signals.
//!
//! - `layout` - signal columns, schemas and the layout hash
//! - `vector` - the schema-tagged vector
//! - `tls` / `dns` - live network signals
//! - `probe` - the `FeatureProbe` contract and the live implementation

pub mod layout;
pub mod vector;
pub mod host;
pub mod dns;
pub mod tls;
pub mod probe;


// Re-export common types
pub use layout::{FeatureSchema, Signal, SchemaMismatchError, URL_COLUMN, LABEL_COLUMN};
pub use vector::FeatureVector;
pub use probe::{FeatureProbe, NetworkProbe, ProbeError};
