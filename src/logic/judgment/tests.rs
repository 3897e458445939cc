use std::collections::HashMap;
use std::path::Path;

use super::{JudgeError, JudgmentLoop, LabelSource, Operator, RetrainOutcome, Unattended, UrlOutcome};
use crate::logic::dataset::{DatasetStore, UrlRecord};
use crate::logic::features::{FeatureProbe, FeatureSchema, FeatureVector};
use crate::logic::model::{ClassifierAdapter, ClassifierError, RandomForest};
use crate::logic::threat::Label;
use tempfile::tempdir;

/// Offline probe with canned vectors; unknown URLs get all zeros
struct StubProbe {
    schema: FeatureSchema,
    canned: HashMap<String, FeatureVector>,
}

impl StubProbe {
    fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            canned: HashMap::new(),
        }
    }

    fn with(mut self, url: &str, values: Vec<f32>) -> Self {
        let schema = FeatureSchema::from_signal_count(values.len()).unwrap();
        self.canned
            .insert(url.to_string(), FeatureVector::from_values(schema, values).unwrap());
        self
    }
}

impl FeatureProbe for StubProbe {
    fn schema(&self) -> FeatureSchema {
        self.schema
    }

    fn extract(&self, url: &str) -> FeatureVector {
        self.canned
            .get(url)
            .cloned()
            .unwrap_or_else(|| FeatureVector::zeroed(self.schema))
    }
}

/// Answers every review with a fixed label and remembers what it was asked
struct Scripted {
    answer: Option<Label>,
    asked: Vec<(String, Label, LabelSource)>,
}

impl Operator for Scripted {
    fn review(&mut self, url: &str, proposed: Label, source: LabelSource) -> Option<Label> {
        self.asked.push((url.to_string(), proposed, source));
        self.answer
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn build(path: &Path, probe: StubProbe) -> JudgmentLoop<StubProbe, RandomForest> {
    let store = DatasetStore::open(path, FeatureSchema::TwoSignal).unwrap();
    let adapter = ClassifierAdapter::new(RandomForest::new(10, 42));
    JudgmentLoop::new(store, adapter, probe).unwrap()
}

#[test]
fn test_fresh_system_fails_closed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");
    let mut judge = build(&path, StubProbe::new(FeatureSchema::TwoSignal));
    assert!(!judge.is_ready());

    let report = judge.run_batch(&urls(&["x.com", "y.com", "  ", "z.com"]), &mut Unattended);

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failures(), 0);
    for judgment in report.judged() {
        assert_eq!(judgment.label, Label::Malicious);
        assert_eq!(judgment.source, LabelSource::FailClosed);
        assert!(!judgment.previously_seen);
    }

    let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
    let records = store.load().unwrap().records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.label == Label::Malicious));

    // The batch's retrain sees those rows
    assert!(matches!(report.retrain, RetrainOutcome::Trained(_)));
    assert!(judge.is_ready());
}

#[test]
fn test_known_url_is_reobserved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");
    {
        let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
        let features = FeatureVector::from_values(FeatureSchema::TwoSignal, vec![1.0, 1.0]).unwrap();
        store.append(&UrlRecord::new("a.example", features, Label::Safe)).unwrap();
    }

    let mut judge = build(&path, StubProbe::new(FeatureSchema::TwoSignal).with("a.example", vec![1.0, 1.0]));
    let mut operator = Scripted { answer: Some(Label::Malicious), asked: Vec::new() };

    // Still Unready: the loop only trains at the end of a batch
    let report = judge.run_batch(&urls(&["a.example"]), &mut operator);

    let judgment = report.judged().next().unwrap();
    assert!(judgment.previously_seen);
    assert_eq!(judgment.source, LabelSource::FailClosed);
    assert!(operator.asked.is_empty());
    assert_eq!(judge.store().len(), 2);
}

#[test]
fn test_known_url_is_predicted_once_trained() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");
    {
        let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
        let features = FeatureVector::from_values(FeatureSchema::TwoSignal, vec![1.0, 1.0]).unwrap();
        store.append(&UrlRecord::new("a.example", features, Label::Safe)).unwrap();
    }

    let mut judge = build(&path, StubProbe::new(FeatureSchema::TwoSignal).with("a.example", vec![1.0, 1.0]));
    assert!(matches!(judge.retrain(), RetrainOutcome::Trained(_)));
    let mut operator = Scripted { answer: Some(Label::Malicious), asked: Vec::new() };

    let report = judge.run_batch(&urls(&["a.example"]), &mut operator);

    assert_eq!(report.failures(), 0);
    let judgment = report.judged().next().unwrap();
    assert!(judgment.previously_seen);
    assert_eq!(judgment.source, LabelSource::Predicted);
    assert_eq!(judgment.label, Label::Safe);
    assert!(operator.asked.is_empty());
    assert_eq!(judge.store().len(), 2);
}

#[test]
fn test_ready_loop_predicts_and_operator_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");
    {
        let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
        for i in 0..6 {
            let safe = FeatureVector::from_values(FeatureSchema::TwoSignal, vec![1.0, 1.0]).unwrap();
            let bad = FeatureVector::zeroed(FeatureSchema::TwoSignal);
            store.append(&UrlRecord::new(format!("good{}.example", i), safe, Label::Safe)).unwrap();
            store.append(&UrlRecord::new(format!("bad{}.example", i), bad, Label::Malicious)).unwrap();
        }
    }

    let probe = StubProbe::new(FeatureSchema::TwoSignal)
        .with("new.example", vec![1.0, 1.0])
        .with("other.example", vec![1.0, 1.0]);
    let mut judge = build(&path, probe);
    assert!(matches!(judge.retrain(), RetrainOutcome::Trained(_)));

    // Unattended: the prediction is recorded as-is
    let report = judge.run_batch(&urls(&["new.example"]), &mut Unattended);
    let judgment = report.judged().next().unwrap();
    assert_eq!(judgment.label, Label::Safe);
    assert_eq!(judgment.source, LabelSource::Predicted);

    // Operator records a different label, which is what gets persisted
    let mut operator = Scripted { answer: Some(Label::Malicious), asked: Vec::new() };
    let report = judge.run_batch(&urls(&["other.example"]), &mut operator);
    let judgment = report.judged().next().unwrap();
    assert_eq!(judgment.label, Label::Malicious);
    assert_eq!(judgment.source, LabelSource::Operator);
    assert_eq!(
        operator.asked,
        vec![("other.example".to_string(), Label::Safe, LabelSource::Predicted)]
    );

    let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
    let last = store.load().unwrap().records().pop().unwrap();
    assert_eq!(last.url, "other.example");
    assert_eq!(last.label, Label::Malicious);
}

#[test]
fn test_operator_label_survives_resubmission() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");
    {
        let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
        for i in 0..6 {
            let safe = FeatureVector::from_values(FeatureSchema::TwoSignal, vec![1.0, 1.0]).unwrap();
            let bad = FeatureVector::zeroed(FeatureSchema::TwoSignal);
            store.append(&UrlRecord::new(format!("good{}.example", i), safe, Label::Safe)).unwrap();
            store.append(&UrlRecord::new(format!("bad{}.example", i), bad, Label::Malicious)).unwrap();
        }
    }

    // Looks like the malicious rows, but the operator knows better
    let mut judge = build(&path, StubProbe::new(FeatureSchema::TwoSignal));
    assert!(matches!(judge.retrain(), RetrainOutcome::Trained(_)));
    let mut operator = Scripted { answer: Some(Label::Safe), asked: Vec::new() };
    let report = judge.run_batch(&urls(&["intranet.example"]), &mut operator);
    assert_eq!(report.judged().next().unwrap().source, LabelSource::Operator);

    // Seen again: no review, the model's label is appended, then a retrain
    let report = judge.run_batch(&urls(&["intranet.example"]), &mut Unattended);
    assert!(report.judged().next().unwrap().previously_seen);

    let state = match report.retrain {
        RetrainOutcome::Trained(state) => state,
        other => panic!("expected a retrain, got {:?}", other),
    };
    assert_eq!(judge.store().len(), 14);
    assert_eq!(state.report.train_rows + state.report.eval_rows, 14);

    let mut store = DatasetStore::open(&path, FeatureSchema::TwoSignal).unwrap();
    let labels: Vec<Label> = store
        .load()
        .unwrap()
        .records()
        .into_iter()
        .filter(|r| r.url == "intranet.example")
        .map(|r| r.label)
        .collect();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0], Label::Safe);
}

#[test]
fn test_failing_url_does_not_stop_the_batch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");

    // Declares two signals but emits three for one URL
    let probe = StubProbe::new(FeatureSchema::TwoSignal).with("broken.example", vec![1.0, 1.0, 1.0]);
    let mut judge = build(&path, probe);

    let report = judge.run_batch(&urls(&["ok1.example", "broken.example", "ok2.example"]), &mut Unattended);

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failures(), 1);
    match &report.outcomes[1] {
        UrlOutcome::Failed { url, error } => {
            assert_eq!(url, "broken.example");
            assert!(matches!(error, JudgeError::Dataset(_)));
        }
        other => panic!("expected a failure, got {:?}", other),
    }
    assert_eq!(report.outcomes[2].url(), "ok2.example");
    assert_eq!(judge.store().len(), 2);
}

#[test]
fn test_wrong_schema_vector_after_training_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d.csv");
    let probe = StubProbe::new(FeatureSchema::TwoSignal).with("broken.example", vec![1.0, 1.0, 1.0]);
    let mut judge = build(&path, probe);

    judge.run_batch(&urls(&["seed.example"]), &mut Unattended);
    assert!(judge.is_ready());

    let err = judge.judge("broken.example", &mut Unattended).unwrap_err();
    assert!(matches!(err, JudgeError::Classifier(ClassifierError::SchemaMismatch(_))));
    assert!(judge.is_ready());
}

#[test]
fn test_empty_dataset_retrain_is_reported() {
    let dir = tempdir().unwrap();
    let mut judge = build(&dir.path().join("d.csv"), StubProbe::new(FeatureSchema::TwoSignal));

    match judge.retrain() {
        RetrainOutcome::Failed(JudgeError::Classifier(ClassifierError::EmptyDataset { dropped })) => {
            assert_eq!(dropped, 0)
        }
        other => panic!("expected an empty-dataset failure, got {:?}", other),
    }
    assert!(!judge.is_ready());
}

#[test]
fn test_probe_schema_must_match_store() {
    let dir = tempdir().unwrap();
    let store = DatasetStore::open(dir.path().join("d.csv"), FeatureSchema::TwoSignal).unwrap();
    let adapter = ClassifierAdapter::new(RandomForest::new(10, 42));

    let result = JudgmentLoop::new(store, adapter, StubProbe::new(FeatureSchema::ThreeSignal));
    assert!(matches!(result, Err(JudgeError::ProbeSchema(_))));
}
