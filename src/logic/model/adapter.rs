//! Classifier Adapter
//!
//! Owns the label encoding and the trained/untrained state around a
//! black-box `Classifier`. Training reads a dataset snapshot and never
//! writes it back.

use chrono::Utc;

use crate::constants;
use crate::logic::dataset::Dataset;
use crate::logic::features::FeatureVector;
use crate::logic::threat::Label;
use super::metrics;
use super::split::train_eval_split;
use super::types::{Classifier, ClassifierError, ClassifierState, TrainingReport};

enum AdapterState<C> {
    Unready,
    Ready { model: C, state: ClassifierState },
}

pub struct ClassifierAdapter<C: Classifier + Clone> {
    /// Unfitted model, cloned for every training run
    prototype: C,
    split_seed: u64,
    current: AdapterState<C>,
}

impl<C: Classifier + Clone> ClassifierAdapter<C> {
    pub fn new(prototype: C) -> Self {
        Self {
            prototype,
            split_seed: constants::DEFAULT_SEED,
            current: AdapterState::Unready,
        }
    }

    /// Seed for the train/eval shuffle
    pub fn with_split_seed(mut self, seed: u64) -> Self {
        self.split_seed = seed;
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.current, AdapterState::Ready { .. })
    }

    /// Snapshot of the active model, if any
    pub fn state(&self) -> Option<&ClassifierState> {
        match &self.current {
            AdapterState::Unready => None,
            AdapterState::Ready { state, .. } => Some(state),
        }
    }

    /// Full refit on a fresh snapshot.
    ///
    /// Malformed rows are dropped; every clean row is a training example, so
    /// an operator label keeps counting after the URL is seen again. On error
    /// the previous state stays active.
    pub fn train(&mut self, dataset: &Dataset) -> Result<ClassifierState, ClassifierError> {
        let schema = dataset.schema();
        let dropped_rows = dataset.dropped();
        let records = dataset.records();

        if records.is_empty() {
            return Err(ClassifierError::EmptyDataset { dropped: dropped_rows });
        }

        let mut label_space: Vec<Label> = records.iter().map(|r| r.label).collect();
        label_space.sort();
        label_space.dedup();

        let mut features = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());
        for record in &records {
            record.features.validate(schema)?;
            features.push(record.features.as_slice().to_vec());
            targets.push(label_space.binary_search(&record.label).unwrap_or_default());
        }

        let split = train_eval_split(records.len(), constants::EVAL_PERCENT, self.split_seed);
        let select = |rows: &[usize]| -> (Vec<Vec<f32>>, Vec<usize>) {
            rows.iter().map(|&i| (features[i].clone(), targets[i])).unzip()
        };
        let (train_x, train_y) = select(&split.train);
        let (eval_x, eval_y) = select(&split.eval);

        let mut model = self.prototype.clone();
        model.fit(&train_x, &train_y, label_space.len());

        let predicted: Vec<usize> = eval_x.iter().map(|row| model.predict(row)).collect();
        let (accuracy, per_label) = metrics::evaluate(&label_space, &eval_y, &predicted);

        let state = ClassifierState {
            feature_schema: schema,
            layout_hash: schema.layout_hash(),
            label_space,
            trained_at: Utc::now(),
            report: TrainingReport {
                accuracy,
                per_label,
                train_rows: train_x.len(),
                eval_rows: eval_x.len(),
                dropped_rows,
                evaluated_on_training_rows: split.evaluated_on_training_rows,
            },
        };

        log::info!("Model trained on {} (accuracy {:.3})\n{}", schema, accuracy, state.report);

        self.current = AdapterState::Ready {
            model,
            state: state.clone(),
        };
        Ok(state)
    }

    /// Label for one vector built on the trained schema
    pub fn predict(&self, features: &FeatureVector) -> Result<Label, ClassifierError> {
        let (model, state) = match &self.current {
            AdapterState::Unready => return Err(ClassifierError::NotTrained),
            AdapterState::Ready { model, state } => (model, state),
        };

        features.validate(state.feature_schema)?;

        let index = model.predict(features.as_slice());
        state.decode(index).ok_or(ClassifierError::UnknownClass(index))
    }
}
