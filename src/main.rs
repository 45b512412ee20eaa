// Main entry point - Dependency injection and server setup
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use wearable_dashboard::application::live_refresh::spawn_live_refresh;
use wearable_dashboard::application::query_controller::QueryController;
use wearable_dashboard::application::series_projector::SeriesProjector;
use wearable_dashboard::domain::query::QueryParameters;
use wearable_dashboard::infrastructure::config::{load_dashboard_config, RefreshMode};
use wearable_dashboard::infrastructure::http_metrics_source::HttpMetricsSource;
use wearable_dashboard::presentation::app_state::AppState;
use wearable_dashboard::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load configuration")?;
    tracing::info!(base_url = %config.api.base_url, mode = ?config.refresh.mode, "Configuration loaded");

    // Metrics service client (infrastructure layer)
    let source = Arc::new(HttpMetricsSource::new(&config.api.base_url, config.api.timeout())?);

    // Controller and projector (application layer)
    let controller = Arc::new(QueryController::new(source, QueryParameters::default()));
    let projector = SeriesProjector::new(config.display.utc_offset_minutes, &config.display.label_format)?;

    if config.refresh.mode == RefreshMode::Live {
        spawn_live_refresh(controller.clone(), config.refresh.debounce());
    }

    // Initial fetch with default parameters
    tokio::spawn({
        let controller = controller.clone();
        async move {
            if let Err(e) = controller.fetch().await {
                tracing::warn!("Initial fetch not dispatched: {}", e);
            }
        }
    });

    let state = Arc::new(AppState {
        controller: controller.clone(),
        projector,
    });
    let router = build_router(state);

    // Start server
    let addr = config.server.bind;
    tracing::info!("Starting wearable-dashboard on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    controller.teardown();
    Ok(())
}
