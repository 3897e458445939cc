//! Judgment Loop
//!
//! extract → predict (or fail closed) → operator review → append, one URL
//! at a time, then a full retrain at the end of every batch.

use crate::logic::dataset::{DatasetStore, UrlRecord};
use crate::logic::features::layout::validate_layout;
use crate::logic::features::FeatureProbe;
use crate::logic::model::{Classifier, ClassifierAdapter, ClassifierError};
use crate::logic::threat::Label;
use super::operator::Operator;
use super::types::{BatchReport, JudgeError, Judgment, LabelSource, RetrainOutcome, UrlOutcome};

pub struct JudgmentLoop<P: FeatureProbe, C: Classifier + Clone> {
    store: DatasetStore,
    adapter: ClassifierAdapter<C>,
    probe: P,
}

impl<P: FeatureProbe, C: Classifier + Clone> JudgmentLoop<P, C> {
    /// The probe must produce vectors for the store's schema
    pub fn new(store: DatasetStore, adapter: ClassifierAdapter<C>, probe: P) -> Result<Self, JudgeError> {
        validate_layout(store.schema(), probe.schema(), probe.schema().arity())?;

        Ok(Self { store, adapter, probe })
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn adapter(&self) -> &ClassifierAdapter<C> {
        &self.adapter
    }

    pub fn is_ready(&self) -> bool {
        self.adapter.is_ready()
    }

    /// Refit from a fresh snapshot; failures leave the current model active
    pub fn retrain(&mut self) -> RetrainOutcome {
        let result = self
            .store
            .load()
            .map_err(JudgeError::from)
            .and_then(|dataset| self.adapter.train(&dataset).map_err(JudgeError::from));

        match result {
            Ok(state) => RetrainOutcome::Trained(state),
            Err(e) => {
                log::warn!("Retrain skipped: {}", e);
                RetrainOutcome::Failed(e)
            }
        }
    }

    /// Judge one URL and append the outcome.
    ///
    /// Known URLs are re-observed (fresh features, fresh row) without asking
    /// the operator.
    pub fn judge<O: Operator + ?Sized>(&mut self, url: &str, operator: &mut O) -> Result<Judgment, JudgeError> {
        let url = url.trim();
        let previously_seen = self.store.contains(url);
        let features = self.probe.extract(url);

        let (proposed, mut source) = match self.adapter.predict(&features) {
            Ok(label) => (label, LabelSource::Predicted),
            Err(ClassifierError::NotTrained) => (Label::fail_closed(), LabelSource::FailClosed),
            Err(e) => return Err(e.into()),
        };

        let mut label = proposed;
        if !previously_seen {
            if let Some(chosen) = operator.review(url, proposed, source) {
                label = chosen;
                source = LabelSource::Operator;
            }
        }

        self.store.append(&UrlRecord::new(url, features.clone(), label))?;

        Ok(Judgment {
            url: url.to_string(),
            features,
            label,
            source,
            previously_seen,
        })
    }

    /// Judge every non-empty entry, then retrain
    pub fn run_batch<O: Operator + ?Sized>(&mut self, urls: &[String], operator: &mut O) -> BatchReport {
        let mut outcomes = Vec::with_capacity(urls.len());

        for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
            match self.judge(url, operator) {
                Ok(judgment) => {
                    log::debug!("{}", judgment);
                    outcomes.push(UrlOutcome::Judged(judgment));
                }
                Err(error) => {
                    log::error!("Failed to judge {}: {}", url, error);
                    outcomes.push(UrlOutcome::Failed {
                        url: url.to_string(),
                        error,
                    });
                }
            }
        }

        let retrain = self.retrain();
        BatchReport { outcomes, retrain }
    }
}
