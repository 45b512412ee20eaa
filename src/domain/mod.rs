// Domain layer - Query parameters, samples, lifecycle and chart models
pub mod chart;
pub mod lifecycle;
pub mod metric;
pub mod query;
pub mod sample;
