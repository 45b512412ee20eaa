// HTTP metrics service client
use crate::application::metrics_source::{FetchError, MetricsSource};
use crate::domain::query::QueryParameters;
use crate::domain::sample::{RawSample, Sample};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpMetricsSource {
    base_url: String,
    client: reqwest::Client,
}

/// Error body the service sends alongside a failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpMetricsSource {
    /// `timeout` of `None` leaves the transport's default in place.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn build_data_url(&self, params: &QueryParameters) -> String {
        let query = params
            .to_query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/data?{}", self.base_url, query)
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn fetch_samples(&self, params: &QueryParameters) -> Result<Vec<Sample>, FetchError> {
        let url = self.build_data_url(params);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            return Err(FetchError::Service {
                status: status.as_u16(),
                message,
            });
        }

        decode_samples(status.as_u16(), &body)
    }
}

/// Decode a 2xx body into samples.
///
/// The service reports internal failures as `{"error": ...}` with a success
/// status, so an object carrying an `error` string is a failure too.
pub fn decode_samples(status: u16, body: &[u8]) -> Result<Vec<Sample>, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FetchError::DataShape(e.to_string()))?;

    if let Value::Object(map) = &value {
        if let Some(Value::String(error)) = map.get("error") {
            return Err(FetchError::Service {
                status,
                message: Some(error.clone()),
            });
        }
    }

    let raw: Vec<RawSample> =
        serde_json::from_value(value).map_err(|e| FetchError::DataShape(e.to_string()))?;

    let mut samples = Vec::with_capacity(raw.len());
    for (index, raw) in raw.into_iter().enumerate() {
        let timestamp = raw.timestamp.clone();
        let sample = raw.into_sample().ok_or_else(|| {
            FetchError::DataShape(format!("invalid timestamp at index {}: {}", index, timestamp))
        })?;
        if !sample.is_numeric() {
            tracing::warn!(index, %timestamp, "Sample value is not numeric");
        }
        samples.push(sample);
    }

    Ok(samples)
}
