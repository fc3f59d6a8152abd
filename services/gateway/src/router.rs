use crate::handlers::{dataset, health};
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/dataset", get(dataset::get_dataset))
        .route("/metadata", get(dataset::get_metadata))
        .route("/market-data", get(dataset::get_market_data));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
