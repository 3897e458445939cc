use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::logic::features::{FeatureSchema, LABEL_COLUMN, URL_COLUMN};
use crate::logic::threat::Label;
use super::codec;
use super::record::{Dataset, DatasetRow, UrlRecord};
use super::DatasetError;

/// Position of a header column in the record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Url,
    Signal(usize),
    Label,
}

/// File-backed, append-only store of judged URLs.
///
/// Single writer per file: the URL index is maintained in memory and is
/// refreshed on every `load`. Concurrent processes appending to the same
/// file are not supported (no file locking).
pub struct DatasetStore {
    path: PathBuf,
    schema: FeatureSchema,
    /// Column order of the file on disk
    layout: Vec<Column>,
    known: HashSet<String>,
    rows: usize,
}

impl DatasetStore {
    /// Open (creating if needed) and validate the dataset at `path`
    pub fn open(path: impl Into<PathBuf>, schema: FeatureSchema) -> Result<Self, DatasetError> {
        let mut store = Self {
            path: path.into(),
            schema,
            layout: canonical_layout(schema),
            known: HashSet::new(),
            rows: 0,
        };

        let dataset = store.load()?;
        log::info!(
            "Dataset {} opened ({}): {}",
            store.path.display(),
            schema,
            dataset.summary()
        );

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    /// Rows currently on disk (as last loaded / appended)
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Create the file with the schema header only
    pub fn initialize_empty(&mut self) -> Result<(), DatasetError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&self.path)?;
        writeln!(file, "{}", codec::join_fields(self.schema.columns()))?;
        file.flush()?;

        self.layout = canonical_layout(self.schema);
        self.known.clear();
        self.rows = 0;

        log::info!("Dataset initialized at {} with header only", self.path.display());
        Ok(())
    }

    /// Read every row; malformed cells become `None`, never an error
    pub fn load(&mut self) -> Result<Dataset, DatasetError> {
        if !self.path.exists() {
            self.initialize_empty()?;
            return Ok(Dataset::empty(self.schema));
        }

        let content = fs::read_to_string(&self.path)?;
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let header = match lines.next() {
            Some(header) => header,
            None => {
                // Zero-length or blank file: treat as never initialized
                self.initialize_empty()?;
                return Ok(Dataset::empty(self.schema));
            }
        };

        let layout = map_header(self.schema, header)?;
        let rows: Vec<DatasetRow> = lines.map(|line| parse_row(&layout, self.schema, line)).collect();

        self.layout = layout;
        self.known = rows.iter().map(|r| r.url.clone()).collect();
        self.rows = rows.len();

        Ok(Dataset::new(self.schema, rows))
    }

    /// Append one record; duplicates are allowed
    pub fn append(&mut self, record: &UrlRecord) -> Result<(), DatasetError> {
        record.features.validate(self.schema)?;

        let url = record.url.trim();
        if url.contains(['\n', '\r']) {
            return Err(DatasetError::InvalidUrl(record.url.clone()));
        }

        if !self.path.exists() {
            self.initialize_empty()?;
        }

        let label = record.label.as_str().to_string();
        let cells: Vec<String> = self.layout
            .iter()
            .map(|column| match column {
                Column::Url => url.to_string(),
                Column::Signal(i) => codec::format_value(record.features.as_slice()[*i]),
                Column::Label => label.clone(),
            })
            .collect();
        let line = codec::join_fields(cells.iter().map(String::as_str));

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            writeln!(file)?;
        }
        writeln!(file, "{}", line)?;
        file.flush()?;

        self.known.insert(url.to_string());
        self.rows += 1;

        log::debug!("Appended {} as {} to {}", url, record.label, self.path.display());
        Ok(())
    }

    /// Membership on the url column only
    pub fn contains(&self, url: &str) -> bool {
        self.known.contains(url.trim())
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn canonical_layout(schema: FeatureSchema) -> Vec<Column> {
    let mut layout = vec![Column::Url];
    layout.extend((0..schema.arity()).map(Column::Signal));
    layout.push(Column::Label);
    layout
}

/// Map header names to columns; any extra, missing or repeated column is a
/// schema error. Column order on disk is free.
fn map_header(schema: FeatureSchema, header: &str) -> Result<Vec<Column>, DatasetError> {
    let found: Vec<String> = codec::split_line(header)
        .into_iter()
        .map(|c| c.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let schema_error = || DatasetError::Schema {
        expected: schema.columns().iter().map(|c| c.to_string()).collect(),
        found: found.clone(),
    };

    let mut layout = Vec::with_capacity(found.len());
    for name in &found {
        let column = match name.as_str() {
            URL_COLUMN => Column::Url,
            LABEL_COLUMN => Column::Label,
            other => Column::Signal(schema.signal_index(other).ok_or_else(schema_error)?),
        };
        if layout.contains(&column) {
            return Err(schema_error());
        }
        layout.push(column);
    }

    if layout.len() != schema.columns().len() {
        return Err(schema_error());
    }

    Ok(layout)
}

fn parse_row(layout: &[Column], schema: FeatureSchema, line: &str) -> DatasetRow {
    let fields = codec::split_line(line);
    let mut row = DatasetRow {
        url: String::new(),
        features: vec![None; schema.arity()],
        label: None,
    };

    for (column, cell) in layout.iter().zip(fields.iter()) {
        match column {
            Column::Url => row.url = cell.trim().to_string(),
            Column::Signal(i) => row.features[*i] = codec::parse_value(cell),
            Column::Label => row.label = Label::from_cell(cell),
        }
    }

    row
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
