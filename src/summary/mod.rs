//! Pre-computed summary reports served as raw JSON

use crate::error::{AppError, Result};
use crate::metrics::SUMMARY_CACHE_LOOKUPS_TOTAL;
use crate::state::AppCache;
use axum::body::Bytes;
use serde::de::IgnoredAny;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Allow-listed summary reports; each maps to `<name>.json` in the data directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SummaryName {
    Inscricoes,
    InscricoesCanceladas,
    InscricoesQuitadas,
    MontanteAcumulado,
    QuantidadeCdas,
    SaldoCdas,
    DistribuicaoCdas,
}

impl SummaryName {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_ref())
    }
}

/// Reads summary files on demand and keeps their validated bytes
#[derive(Clone)]
pub struct SummaryStore {
    dir: PathBuf,
    cache: AppCache<SummaryName, Bytes>,
}

impl SummaryStore {
    pub fn new(dir: impl Into<PathBuf>, capacity: u64, ttl: Option<Duration>) -> Self {
        Self {
            dir: dir.into(),
            cache: AppCache::new(capacity, ttl),
        }
    }

    /// Fetch a summary's JSON document by its public name
    pub async fn get(&self, name: &str) -> Result<Bytes> {
        let summary = SummaryName::from_str(name)
            .map_err(|_| AppError::UnknownResource(format!("Resumo não encontrado: {}", name)))?;

        if let Some(blob) = self.cache.get(&summary).await {
            SUMMARY_CACHE_LOOKUPS_TOTAL.with_label_values(&["hit"]).inc();
            tracing::debug!(summary = %summary, "Summary served from cache");
            return Ok(blob);
        }
        SUMMARY_CACHE_LOOKUPS_TOTAL.with_label_values(&["miss"]).inc();

        let path = self.dir.join(summary.file_name());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::UnknownResource(format!(
                    "Arquivo de resumo não encontrado: {}",
                    summary.file_name()
                )));
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        // Served verbatim, but only once known to be well-formed JSON
        serde_json::from_slice::<IgnoredAny>(&bytes)?;
        let blob = Bytes::from(bytes);
        self.cache.insert(summary, blob.clone()).await;

        tracing::debug!(summary = %summary, path = %path.display(), "Summary loaded");
        Ok(blob)
    }

    pub fn cached_entries(&self) -> u64 {
        self.cache.entry_count()
    }
}
