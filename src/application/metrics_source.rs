// Source trait for metric samples
use crate::domain::query::{QueryParameters, ValidationError};
use crate::domain::sample::Sample;
use async_trait::async_trait;
use thiserror::Error;

/// Generic description used when the transport gives nothing better.
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";
pub const MALFORMED_BODY_MESSAGE: &str = "Malformed response body";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service answered with an error, either a non-2xx status or an
    /// `{"error": ...}` body. `message` is the structured field if present.
    #[error("Service error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Service { status: u16, message: Option<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    DataShape(String),

    #[error("Controller has been torn down")]
    Closed,
}

impl FetchError {
    /// Text surfaced in `Failed(message)`.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Validation(e) => e.to_string(),
            FetchError::Service {
                message: Some(message),
                ..
            } => message.clone(),
            FetchError::Service {
                status,
                message: None,
            } => format!("Request failed with status code {}", status),
            FetchError::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
            FetchError::DataShape(_) => MALFORMED_BODY_MESSAGE.to_string(),
            FetchError::Closed => "Request was cancelled".to_string(),
        }
    }
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch all samples matching the parameters, in service order.
    async fn fetch_samples(&self, params: &QueryParameters) -> Result<Vec<Sample>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_structured_error() {
        let err = FetchError::Service {
            status: 500,
            message: Some("user not found".to_string()),
        };
        assert_eq!(err.user_message(), "user not found");
    }

    #[test]
    fn test_user_message_generic_fallbacks() {
        let err = FetchError::Service {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), "Request failed with status code 502");

        let err = FetchError::Transport("error sending request: connection refused".to_string());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);

        let err = FetchError::DataShape("expected array".to_string());
        assert_eq!(err.user_message(), MALFORMED_BODY_MESSAGE);
    }
}
