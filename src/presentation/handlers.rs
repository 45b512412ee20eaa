// HTTP request handlers
use crate::application::metrics_source::FetchError;
use crate::domain::metric::Metric;
use crate::domain::query::{QueryField, QueryParameters, ValidationError};
use crate::presentation::app_state::AppState;
use crate::presentation::view::DashboardView;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    Json,
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;

/// Partial parameter edit. Values arrive as text, the way input controls
/// produce them.
#[derive(Debug, Default, Deserialize)]
pub struct QueryUpdate {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub user_id: Option<String>,
    pub metric: Option<String>,
}

impl QueryUpdate {
    fn into_fields(self) -> Result<Vec<QueryField>, ValidationError> {
        let pairs = [
            ("start_date", self.start_date),
            ("end_date", self.end_date),
            ("user_id", self.user_id),
            ("metric", self.metric),
        ];
        pairs
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| QueryField::parse(field, &v)))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricOption {
    pub value: Metric,
    pub label: &'static str,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Validation(e) => e.into(),
            FetchError::Closed => ApiError(
                StatusCode::SERVICE_UNAVAILABLE,
                FetchError::Closed.user_message(),
            ),
            other => ApiError(StatusCode::BAD_GATEWAY, other.user_message()),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Selectable metrics, for the metric picker
pub async fn list_metrics() -> Json<Vec<MetricOption>> {
    Json(
        Metric::ALL
            .into_iter()
            .map(|m| MetricOption {
                value: m,
                label: m.display_name(),
            })
            .collect(),
    )
}

pub async fn get_query(State(state): State<Arc<AppState>>) -> Json<QueryParameters> {
    Json(state.controller.snapshot().params)
}

/// Apply a partial edit. Nothing is applied if any field is rejected.
pub async fn update_query(
    State(state): State<Arc<AppState>>,
    Json(update): Json<QueryUpdate>,
) -> Result<Json<QueryParameters>, ApiError> {
    let fields = update.into_fields()?;
    for field in fields {
        state.controller.set(field);
    }
    Ok(Json(state.controller.snapshot().params))
}

/// Explicit fetch trigger; responds once the request has settled.
///
/// The request runs in its own task so a client that disconnects does not
/// cancel it.
pub async fn trigger_fetch(State(state): State<Arc<AppState>>) -> Result<Json<DashboardView>, ApiError> {
    let controller = state.controller.clone();
    tokio::spawn(async move { controller.fetch().await })
        .await
        .map_err(|e| {
            tracing::error!("Fetch task failed: {}", e);
            ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })??;
    Ok(Json(current_view(&state)))
}

pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(current_view(&state))
}

/// Stream the view model on every state change
pub async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.controller.subscribe();
    let projector = state.projector.clone();

    let stream = async_stream::stream! {
        loop {
            let (view, torn_down) = {
                let session = rx.borrow_and_update();
                (DashboardView::from_state(&session, &projector), session.torn_down)
            };
            match Event::default().event("view").json_data(&view) {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::warn!("Failed to encode view event: {}", e),
            }
            if torn_down || rx.changed().await.is_err() {
                break;
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn current_view(state: &AppState) -> DashboardView {
    DashboardView::from_state(&state.controller.snapshot(), &state.projector)
}
