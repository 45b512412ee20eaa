// Query controller - Owns query parameters and the request lifecycle
use crate::application::metrics_source::{FetchError, MetricsSource};
use crate::domain::lifecycle::{RequestLifecycle, SampleSet};
use crate::domain::query::{QueryField, QueryParameters, ValidationError};
use crate::domain::sample::Sample;
use std::sync::Arc;
use tokio::sync::watch;

/// Everything one dashboard session knows. Observers receive a new value
/// on every change.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub params: QueryParameters,
    pub lifecycle: RequestLifecycle,
    /// Samples of the last successful fetch. Kept while `Loading` or `Failed`
    /// so the chart does not flash empty.
    pub samples: SampleSet,
    /// Why the current parameters cannot be dispatched, if they cannot.
    pub validation_error: Option<ValidationError>,
    /// Bumped on every parameter edit that changes a value.
    pub revision: u64,
    /// Sequence number of the most recently issued request.
    pub request_seq: u64,
    pub torn_down: bool,
}

impl SessionState {
    fn new(params: QueryParameters) -> Self {
        let validation_error = params.validate().err();
        Self {
            params,
            lifecycle: RequestLifecycle::Idle,
            samples: Arc::from(Vec::<Sample>::new()),
            validation_error,
            revision: 0,
            request_seq: 0,
            torn_down: false,
        }
    }
}

/// How a settled fetch was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success { total_points: usize },
    Failed(String),
    /// A newer request was issued, or the controller was torn down, before
    /// this one settled. State was left untouched.
    Superseded,
}

pub struct QueryController {
    source: Arc<dyn MetricsSource>,
    state: watch::Sender<SessionState>,
}

impl QueryController {
    pub fn new(source: Arc<dyn MetricsSource>, params: QueryParameters) -> Self {
        let (state, _) = watch::channel(SessionState::new(params));
        Self { source, state }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Set one field from its wire name and raw value. Unknown fields,
    /// unknown metrics and malformed dates are rejected and leave the
    /// parameters unchanged.
    pub fn update_parameter(&self, field: &str, value: &str) -> Result<(), ValidationError> {
        let field = QueryField::parse(field, value)?;
        self.set(field);
        Ok(())
    }

    pub fn set(&self, field: QueryField) {
        self.state.send_if_modified(|state| {
            let mut params = state.params.clone();
            params.apply(field);
            if params == state.params {
                return false;
            }
            state.validation_error = params.validate().err();
            state.params = params;
            state.revision += 1;
            true
        });
    }

    /// Issue one request for the current parameters and apply its result.
    ///
    /// Returns `Err` only when nothing was dispatched: the parameters are
    /// invalid or the controller is torn down. Service and transport failures
    /// are recorded as `Failed` and reported through [`FetchOutcome`].
    pub async fn fetch(&self) -> Result<FetchOutcome, FetchError> {
        let (seq, params) = self.begin()?;

        let mut guard = SettleGuard {
            controller: self,
            seq,
            settled: false,
        };

        tracing::debug!(
            seq,
            user_id = %params.user_id,
            metric = %params.metric,
            start_date = %params.start_date,
            end_date = %params.end_date,
            "Dispatching metrics request"
        );
        let result = self.source.fetch_samples(&params).await;

        guard.settled = true;
        Ok(self.settle(seq, result))
    }

    /// Stop applying responses. Requests still in flight are discarded
    /// without touching the lifecycle.
    pub fn teardown(&self) {
        self.state.send_modify(|state| {
            state.torn_down = true;
            state.request_seq += 1;
        });
    }

    fn begin(&self) -> Result<(u64, QueryParameters), FetchError> {
        let mut begun = Err(FetchError::Closed);
        self.state.send_if_modified(|state| {
            if state.torn_down {
                return false;
            }
            if let Err(e) = state.params.validate() {
                tracing::warn!("Rejecting fetch: {}", e);
                begun = Err(FetchError::Validation(e));
                return false;
            }
            state.request_seq += 1;
            state.lifecycle = RequestLifecycle::Loading;
            begun = Ok((state.request_seq, state.params.clone()));
            true
        });
        begun
    }

    fn settle(&self, seq: u64, result: Result<Vec<Sample>, FetchError>) -> FetchOutcome {
        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if state.torn_down || state.request_seq != seq {
                tracing::debug!(seq, latest = state.request_seq, "Discarding stale response");
                return false;
            }

            match result {
                Ok(samples) => {
                    let samples: SampleSet = samples.into();
                    tracing::info!(seq, points = samples.len(), "Metrics request succeeded");
                    outcome = FetchOutcome::Success {
                        total_points: samples.len(),
                    };
                    state.samples = samples.clone();
                    state.lifecycle = RequestLifecycle::Success(samples);
                }
                Err(e) => {
                    let message = e.user_message();
                    tracing::warn!(seq, error = %e, "Metrics request failed");
                    outcome = FetchOutcome::Failed(message.clone());
                    state.lifecycle = RequestLifecycle::Failed(message);
                }
            }
            true
        });
        outcome
    }
}

/// Moves the lifecycle out of `Loading` when a fetch future is dropped
/// before its request settles.
struct SettleGuard<'a> {
    controller: &'a QueryController,
    seq: u64,
    settled: bool,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.settle(self.seq, Err(FetchError::Closed));
        }
    }
}
