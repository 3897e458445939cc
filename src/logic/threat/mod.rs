//! Threat Module
//!
//! Label vocabulary shared by the dataset, the model adapter and the loop.

pub mod types;

pub use types::{Label, ParseLabelError};
