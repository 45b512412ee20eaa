// Router for the dashboard session surface
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_query, get_view, health_check, list_metrics, stream_events, trigger_fetch, update_query,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", get(list_metrics))
        .route("/query", get(get_query).patch(update_query))
        .route("/fetch", post(trigger_fetch))
        .route("/view", get(get_view))
        .route("/events", get(stream_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
