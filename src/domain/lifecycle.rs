// Request lifecycle state machine
use serde::Serialize;
use std::sync::Arc;

use super::sample::Sample;

/// Samples returned by one successful fetch. Shared, never mutated.
pub type SampleSet = Arc<[Sample]>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestLifecycle {
    #[default]
    Idle,
    Loading,
    Success(SampleSet),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failed,
}

impl RequestLifecycle {
    pub fn phase(&self) -> Phase {
        match self {
            RequestLifecycle::Idle => Phase::Idle,
            RequestLifecycle::Loading => Phase::Loading,
            RequestLifecycle::Success(_) => Phase::Success,
            RequestLifecycle::Failed(_) => Phase::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestLifecycle::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestLifecycle::Failed(message) => Some(message),
            _ => None,
        }
    }
}
