use crate::api::{handlers, AppState};
use crate::metrics::MetricsLayer;
use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    let metrics_enabled = state.metrics_enabled;

    let mut router = Router::new()
        // Health endpoints
        .route("/", get(handlers::health_check))
        .route("/health", get(handlers::health_check))
        // Pre-computed summaries
        .route("/resumo/:nome", get(handlers::get_summary))
        // CDA search
        .route("/cda/search", get(handlers::search_cdas))
        // KPIs
        .route("/kpis/volume_em_cobranca", get(handlers::kpi_volume_em_cobranca));

    if metrics_enabled {
        router = router
            .route("/metrics", get(handlers::metrics))
            .layer(MetricsLayer::new());
    }

    router
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
