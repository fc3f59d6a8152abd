use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use market_data::snapshot::get_latest;
use types::dataset::{Dataset, DatasetMetadata};

/// Readers may cache the latest snapshot briefly; the pointer changes rarely.
pub const SNAPSHOT_CACHE_CONTROL: &str = "public, max-age=60";

/// GET /api/dataset: the latest published snapshot.
pub async fn get_dataset(State(state): State<AppState>) -> Result<Response, AppError> {
    let snapshot = get_latest(state.blobs.as_ref(), state.pointer.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Dataset metadata not found.".into()))?;

    Ok((
        [(header::CACHE_CONTROL, SNAPSHOT_CACHE_CONTROL)],
        Json(snapshot),
    )
        .into_response())
}

/// GET /api/metadata: freshness of the bundled dataset.
pub async fn get_metadata(State(state): State<AppState>) -> Json<DatasetMetadata> {
    Json(state.local_dataset.get_dataset().metadata)
}

/// GET /api/market-data: the bundled dataset rows and metadata.
pub async fn get_market_data(State(state): State<AppState>) -> Json<Dataset> {
    Json(state.local_dataset.get_dataset())
}
