//! Where raw dataset rows come from

use crate::state::error::DatasetError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Raw, untyped dataset rows in file order
pub type RawRows = Arc<[Value]>;

/// Source of raw dataset rows.
///
/// Implementations may block; callers run them on the blocking pool.
pub trait RowSource: Send + Sync {
    /// Read every row, in dataset order
    fn load_rows(&self) -> Result<RawRows, DatasetError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Rows read from a JSON array file
#[derive(Debug, Clone)]
pub struct FileRowSource {
    path: PathBuf,
}

impl FileRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for FileRowSource {
    fn load_rows(&self) -> Result<RawRows, DatasetError> {
        if !self.path.exists() {
            return Err(DatasetError::Unavailable(format!(
                "dataset file not found: {}",
                self.path.display()
            )));
        }

        let bytes = std::fs::read(&self.path).map_err(|e| {
            DatasetError::Unavailable(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(rows)) => Ok(rows.into()),
            Ok(_) => Err(DatasetError::Unavailable(format!(
                "{} does not contain a JSON array",
                self.path.display()
            ))),
            Err(e) => Err(DatasetError::Unavailable(format!(
                "{} is not valid JSON: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Rows held in memory; used by tests and embedders
#[derive(Debug, Clone)]
pub struct InMemoryRowSource {
    rows: RawRows,
}

impl InMemoryRowSource {
    pub fn new(rows: Vec<Value>) -> Self {
        Self { rows: rows.into() }
    }
}

impl RowSource for InMemoryRowSource {
    fn load_rows(&self) -> Result<RawRows, DatasetError> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} rows)", self.rows.len())
    }
}
