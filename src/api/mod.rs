pub mod handlers;
pub mod params;
pub mod routes;

pub use params::SearchParams;
pub use routes::*;

use crate::config::Config;
use crate::state::DatasetCache;
use crate::summary::SummaryStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub datasets: Arc<DatasetCache>,
    pub summaries: SummaryStore,
    pub metrics_enabled: bool,
}

impl AppState {
    pub fn new(datasets: Arc<DatasetCache>, summaries: SummaryStore) -> Self {
        Self {
            datasets,
            summaries,
            metrics_enabled: false,
        }
    }

    /// State wired from configuration: dataset file and summary directory
    pub fn from_config(config: &Config) -> Self {
        let datasets = Arc::new(DatasetCache::from_path(config.data.cda_path()));
        let summaries = SummaryStore::new(
            config.data.dir.clone(),
            config.data.summary_cache_capacity,
            config.data.summary_cache_ttl(),
        );

        Self::new(datasets, summaries).with_metrics(config.observability.prometheus_enabled)
    }

    /// Expose `/metrics` and record HTTP metrics
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }
}
