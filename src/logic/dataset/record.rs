use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureSchema, FeatureVector};
use crate::logic::threat::Label;

/// One judged URL
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub url: String,
    pub features: FeatureVector,
    pub label: Label,
}

impl UrlRecord {
    pub fn new(url: impl Into<String>, features: FeatureVector, label: Label) -> Self {
        Self {
            url: url.into(),
            features,
            label,
        }
    }
}

/// A row as read from disk; malformed cells are `None`
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub url: String,
    pub features: Vec<Option<f32>>,
    pub label: Option<Label>,
}

impl DatasetRow {
    /// Clean record, or None when any cell is missing / non-numeric
    pub fn to_record(&self, schema: FeatureSchema) -> Option<UrlRecord> {
        if self.url.is_empty() {
            return None;
        }
        let label = self.label?;
        let values = self.features.iter().copied().collect::<Option<Vec<f32>>>()?;
        let features = FeatureVector::from_values(schema, values).ok()?;

        Some(UrlRecord::new(self.url.clone(), features, label))
    }
}

impl From<&UrlRecord> for DatasetRow {
    fn from(record: &UrlRecord) -> Self {
        Self {
            url: record.url.clone(),
            features: record.features.as_slice().iter().map(|v| Some(*v)).collect(),
            label: Some(record.label),
        }
    }
}

/// Ordered snapshot of everything on disk
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: FeatureSchema,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new(schema: FeatureSchema, rows: Vec<DatasetRow>) -> Self {
        Self { schema, rows }
    }

    pub fn empty(schema: FeatureSchema) -> Self {
        Self::new(schema, Vec::new())
    }

    /// In-memory dataset from clean records (tests, imports)
    pub fn from_records(schema: FeatureSchema, records: &[UrlRecord]) -> Self {
        Self::new(schema, records.iter().map(DatasetRow::from).collect())
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        let url = url.trim();
        self.rows.iter().any(|r| r.url == url)
    }

    /// Rows that survive cleaning, in file order
    pub fn records(&self) -> Vec<UrlRecord> {
        self.rows
            .iter()
            .filter_map(|row| row.to_record(self.schema))
            .collect()
    }

    /// Number of rows cleaning would drop
    pub fn dropped(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.to_record(self.schema).is_none())
            .count()
    }

    /// Clean records with one entry per URL: the most recent row wins,
    /// positioned where the URL first appeared.
    pub fn latest_by_url(&self) -> Vec<UrlRecord> {
        let mut position: HashMap<String, usize> = HashMap::new();
        let mut latest: Vec<UrlRecord> = Vec::new();

        for record in self.records() {
            match position.get(&record.url) {
                Some(&i) => latest[i] = record,
                None => {
                    position.insert(record.url.clone(), latest.len());
                    latest.push(record);
                }
            }
        }

        latest
    }

    pub fn summary(&self) -> DatasetSummary {
        let records = self.records();
        let mut distinct: Vec<&str> = self.rows.iter().map(|r| r.url.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();

        DatasetSummary {
            rows: self.rows.len(),
            clean: records.len(),
            dropped: self.rows.len() - records.len(),
            distinct_urls: distinct.len(),
            safe: records.iter().filter(|r| r.label == Label::Safe).count(),
            malicious: records.iter().filter(|r| r.label == Label::Malicious).count(),
        }
    }
}

/// Counts for logs and the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub clean: usize,
    pub dropped: usize,
    pub distinct_urls: usize,
    pub safe: usize,
    pub malicious: usize,
}

impl std::fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows ({} clean, {} dropped), {} distinct URLs, {} Safe / {} Malicious",
            self.rows, self.clean, self.dropped, self.distinct_urls, self.safe, self.malicious
        )
    }
}
