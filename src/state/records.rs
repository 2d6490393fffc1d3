//! Immutable, validated record store

use crate::models::CdaRecord;
use crate::search::Position;
use crate::state::error::DatasetError;
use serde_json::Value;
use std::sync::Arc;

/// Validated CDA records in dataset order.
///
/// The order never changes after construction; positions handed out by the
/// categorical index refer to it.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[CdaRecord]>,
}

impl RecordStore {
    /// Validate raw rows strictly; the first bad row aborts the whole load
    pub fn from_rows(rows: &[Value]) -> Result<Self, DatasetError> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                CdaRecord::deserialize_row(row).map_err(|e| DatasetError::InvalidRecord {
                    position,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_records(records)
    }

    pub fn from_records(records: Vec<CdaRecord>) -> Result<Self, DatasetError> {
        if records.len() > Position::MAX as usize {
            return Err(DatasetError::TooManyRecords(records.len()));
        }
        Ok(Self {
            records: records.into(),
        })
    }

    pub fn get(&self, position: Position) -> Option<&CdaRecord> {
        self.records.get(position as usize)
    }

    pub fn records(&self) -> &[CdaRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CdaRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
