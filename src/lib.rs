// Wearable metrics dashboard - query a metric time series and project it for charting
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
