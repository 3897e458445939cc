//! Dataset Module - Labeled URL store
//!
//! Every judged URL lands here as one CSV row (url, signals..., label).
//! The store is the only writer; training works on `Dataset` snapshots.

pub mod record;
pub mod codec;
pub mod store;


use thiserror::Error;

use crate::logic::features::SchemaMismatchError;

pub use record::{Dataset, DatasetRow, DatasetSummary, UrlRecord};
pub use store::DatasetStore;

/// Dataset failures (fatal to the operation, never to the file)
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset columns {found:?} do not match the active schema {expected:?}")]
    Schema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("record does not fit the dataset: {0}")]
    RecordSchema(#[from] SchemaMismatchError),

    #[error("url {0:?} contains a line break")]
    InvalidUrl(String),
}
