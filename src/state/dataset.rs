//! One-time dataset loading shared by every request

use crate::analytics;
use crate::metrics::{DATASET_LOAD_DURATION_SECONDS, DATASET_RECORDS};
use crate::search::{CategoricalIndex, IndexStats};
use crate::state::error::DatasetError;
use crate::state::records::RecordStore;
use crate::state::source::{FileRowSource, RowSource};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;

/// Record store and its categorical index, built together and never mutated
#[derive(Debug)]
pub struct Dataset {
    pub store: RecordStore,
    pub index: CategoricalIndex,
}

impl Dataset {
    /// Validate `rows` and index them
    pub fn build(rows: &[Value]) -> Result<Self, DatasetError> {
        let store = RecordStore::from_rows(rows)?;
        let index = CategoricalIndex::build(store.records());
        Ok(Self { store, index })
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

type PendingLoad = Shared<BoxFuture<'static, Result<(), DatasetError>>>;

/// Process-wide, build-once cache of the dataset and the in-collection KPI.
///
/// Both values come out of a single load that runs on the blocking pool,
/// detached from the callers that asked for it: a caller that gives up
/// (timeout, disconnect) does not abort the load, and later callers join it
/// instead of starting another. Raw rows live only for the duration of that
/// load. A failed load is not remembered, so the next call tries again.
pub struct DatasetCache {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn RowSource>,
    dataset: OnceLock<Arc<Dataset>>,
    in_collection: OnceLock<u64>,
    in_flight: Mutex<Option<PendingLoad>>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn RowSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                dataset: OnceLock::new(),
                in_collection: OnceLock::new(),
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Cache backed by a JSON array file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileRowSource::new(path)))
    }

    /// Validated store and index, built on first use
    pub async fn dataset(&self) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(dataset) = self.inner.dataset.get() {
            return Ok(dataset.clone());
        }

        let outcome = self.load().await;
        match self.inner.dataset.get() {
            Some(dataset) => Ok(dataset.clone()),
            None => Err(outcome.err().unwrap_or_else(|| {
                DatasetError::Unavailable("dataset load finished without a dataset".to_string())
            })),
        }
    }

    /// Number of rows whose status is "in collection", counted leniently
    /// over the raw rows so malformed rows are skipped instead of failing
    pub async fn in_collection_count(&self) -> Result<u64, DatasetError> {
        if let Some(total) = self.inner.in_collection.get() {
            return Ok(*total);
        }

        // The KPI is set before strict validation runs, so it survives an
        // invalid record
        let outcome = self.load().await;
        match self.inner.in_collection.get() {
            Some(total) => Ok(*total),
            None => Err(outcome.err().unwrap_or_else(|| {
                DatasetError::Unavailable("dataset load finished without a KPI".to_string())
            })),
        }
    }

    /// Whether the typed dataset has been built
    pub fn is_loaded(&self) -> bool {
        self.inner.dataset.get().is_some()
    }

    /// Join the load in progress, or start one
    async fn load(&self) -> Result<(), DatasetError> {
        let pending = {
            let mut in_flight = self.inner.lock_in_flight();
            if self.inner.is_complete() {
                return Ok(());
            }
            match in_flight.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let inner = self.inner.clone();
                    let handle = tokio::task::spawn_blocking(move || inner.load_blocking());
                    let pending: PendingLoad = async move {
                        handle.await.map_err(|e| {
                            DatasetError::Unavailable(format!("dataset loader failed: {}", e))
                        })?
                    }
                    .boxed()
                    .shared();
                    *in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        let outcome = pending.clone().await;
        if outcome.is_err() {
            // A loader that panicked never cleared its own slot
            let mut in_flight = self.inner.lock_in_flight();
            if in_flight.as_ref().is_some_and(|p| p.ptr_eq(&pending)) {
                in_flight.take();
            }
        }
        outcome
    }
}

impl Inner {
    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, Option<PendingLoad>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_complete(&self) -> bool {
        self.dataset.get().is_some() && self.in_collection.get().is_some()
    }

    fn load_blocking(&self) -> Result<(), DatasetError> {
        let result = self.populate();
        // Values are published before the slot clears, so a caller that
        // finds the slot empty also finds them
        self.lock_in_flight().take();
        result
    }

    /// Read rows once and fill whichever values are still missing; the rows
    /// are dropped on return
    fn populate(&self) -> Result<(), DatasetError> {
        let origin = self.source.describe();
        let start_time = Instant::now();
        let rows = self.source.load_rows()?;

        tracing::info!(
            source = %origin,
            rows = rows.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Dataset rows loaded"
        );

        if self.in_collection.get().is_none() {
            let total = analytics::count_in_collection(rows.iter().map(analytics::status_from_row));
            let _ = self.in_collection.set(total);
            tracing::info!(total, "In-collection KPI computed");
        }

        if self.dataset.get().is_none() {
            let start_time = Instant::now();
            let dataset = Dataset::build(&rows)
                .inspect_err(|e| tracing::error!(error = %e, "Dataset validation failed"))?;

            let elapsed = start_time.elapsed();
            let stats = dataset.stats();
            DATASET_RECORDS.set(stats.positions as f64);
            DATASET_LOAD_DURATION_SECONDS.observe(elapsed.as_secs_f64());

            tracing::info!(
                records = stats.positions,
                categories = stats.categories,
                statuses = stats.statuses,
                elapsed_ms = elapsed.as_millis() as u64,
                "Dataset indexed"
            );
            let _ = self.dataset.set(Arc::new(dataset));
        }

        Ok(())
    }
}
