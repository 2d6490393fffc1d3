use crate::api::{AppState, SearchParams};
use crate::error::Result;
use crate::metrics::{gather_metrics, SEARCH_DURATION_SECONDS, SEARCH_REQUESTS_TOTAL};
use crate::models::CdaItemResponse;
use crate::search;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Serve a pre-computed summary document verbatim
pub async fn get_summary(
    State(state): State<AppState>,
    Path(nome): Path<String>,
) -> Result<impl IntoResponse> {
    let body: Bytes = state.summaries.get(&nome).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Search CDAs
pub async fn search_cdas(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CdaSearchResponse>> {
    let query = SearchParams::parse(pairs)?.into_query();
    let dataset = state.datasets.dataset().await?;

    let start_time = Instant::now();
    let page = search::search(&dataset.store, &dataset.index, &query);
    SEARCH_DURATION_SECONDS.observe(start_time.elapsed().as_secs_f64());
    SEARCH_REQUESTS_TOTAL
        .with_label_values(&[page.outcome()])
        .inc();

    Ok(Json(CdaSearchResponse {
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        items: page.items.into_iter().map(CdaItemResponse::from).collect(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CdaSearchResponse {
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub items: Vec<CdaItemResponse>,
}

/// Count of CDAs currently in collection
pub async fn kpi_volume_em_cobranca(State(state): State<AppState>) -> Result<Json<KpiResponse>> {
    let total = state.datasets.in_collection_count().await?;
    Ok(Json(KpiResponse { total }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KpiResponse {
    pub total: u64,
}

/// Prometheus metrics endpoint
pub async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, gather_metrics())
}
