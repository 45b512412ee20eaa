// View model served to the rendering surface
use crate::application::query_controller::SessionState;
use crate::application::series_projector::SeriesProjector;
use crate::domain::chart::{ChartSeries, DisplayConfig};
use crate::domain::lifecycle::Phase;
use crate::domain::query::QueryParameters;
use serde::Serialize;

pub const LOADING_NOTICE: &str = "Loading...";
pub const NO_DATA_NOTICE: &str = "No data found for this selection.";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub phase: Phase,
    pub params: QueryParameters,
    /// Shown while a request is in flight.
    pub loading: Option<&'static str>,
    /// Inline error from the last failed request.
    pub error: Option<String>,
    /// Why the current parameters will not be fetched.
    pub validation_error: Option<String>,
    /// Shown when not loading and there is nothing to chart.
    pub empty: Option<&'static str>,
    pub total_points: usize,
    pub series: ChartSeries,
    pub config: DisplayConfig,
}

impl DashboardView {
    pub fn from_state(state: &SessionState, projector: &SeriesProjector) -> Self {
        let projection = projector.project(&state.samples, state.params.metric);
        let loading = state.lifecycle.is_loading();

        Self {
            phase: state.lifecycle.phase(),
            params: state.params.clone(),
            loading: loading.then_some(LOADING_NOTICE),
            error: state.lifecycle.error().map(str::to_string),
            validation_error: state.validation_error.as_ref().map(|e| e.to_string()),
            empty: (!loading && projection.total_points == 0).then_some(NO_DATA_NOTICE),
            total_points: projection.total_points,
            series: projection.series,
            config: projection.config,
        }
    }
}
