use crate::models::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, Json};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: market_data::SERVICE_VERSION,
        ingest: state.ingest_metrics.export(),
        last_published: state.ingest_metrics.last_success(),
        local_dataset_fallbacks: state.local_dataset.fallback_count(),
    })
}
