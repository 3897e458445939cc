//! Operator hook for unseen URLs

use crate::logic::threat::Label;
use super::types::LabelSource;

/// Human in the loop: given the proposed label for a URL the dataset has
/// never seen, and where that label came from, return `Some(label)` to
/// record that label instead.
pub trait Operator {
    fn review(&mut self, url: &str, proposed: Label, source: LabelSource) -> Option<Label>;
}

/// Never overrides (batch runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl Operator for Unattended {
    fn review(&mut self, _url: &str, _proposed: Label, _source: LabelSource) -> Option<Label> {
        None
    }
}
