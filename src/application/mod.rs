// Application layer - Query lifecycle and series projection
pub mod live_refresh;
pub mod metrics_source;
pub mod query_controller;
pub mod series_projector;
