//! Phisheye - URL safety classifier
//!
//! Network signals per URL, a growing labeled dataset, and a classifier that
//! is retrained after every batch of judgments.

pub mod constants;
pub mod logic;
