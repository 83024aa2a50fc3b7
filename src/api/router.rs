use axum::{
    Router,
    routing::get,
};
use tower_http::trace::TraceLayer;

use super::health;
use super::labelling;
use super::models;
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Labelling API
        .route("/models", get(models::list_models))
        .route("/models/{name}", get(models::model_detail))
        .route("/models/{name}/random", get(labelling::random_document))
        .route(
            "/models/{name}/{document_id}",
            get(labelling::labelling_page).post(labelling::submit_label),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
