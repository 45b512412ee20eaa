// Application state for HTTP handlers
use crate::application::query_controller::QueryController;
use crate::application::series_projector::SeriesProjector;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<QueryController>,
    pub projector: SeriesProjector,
}
