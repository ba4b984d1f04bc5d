use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validators::ValidationError;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Environment variable {name} is not a JSON array of strings: {reason}")]
    InvalidAssetList { name: String, reason: String },

    #[error("No turbine assets configured")]
    NoAssets,

    #[error("Invalid asset name: {0}")]
    InvalidAssetName(#[from] ValidationError),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Errors talking to the telemetry service
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to build request: {0}")]
    Request(String),

    #[error("SiteWise error: {0}")]
    Service(String),
}

/// Errors building the turbine query from invocation parameters
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid query parameters: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Errors from one producer invocation
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Failed to send measurements for asset {asset}: {source}")]
    Asset {
        asset: String,
        #[source]
        source: TelemetryError,
    },

    #[error("Failed to send measurements for {} asset(s): {}", .0.len(), .0.join(", "))]
    Assets(Vec<String>),
}

/// Body of a failed query invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Status envelope returned by the query handler
///
/// `body` is itself a JSON-encoded string, matching the API Gateway proxy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEnvelope {
    pub status_code: u16,
    pub body: String,
}

impl QueryEnvelope {
    /// Wrap a serializable payload in a 200 envelope
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self {
                status_code: 200,
                body,
            },
            Err(e) => Self::error(format!("Failed to serialize response: {}", e)),
        }
    }

    /// Build a 500 envelope carrying `{"error": message}`
    pub fn error(message: impl Into<String>) -> Self {
        let body = serde_json::to_string(&ErrorBody::new(message))
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize error response"}"#.to_string());

        Self {
            status_code: 500,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

impl<E> From<aws_sdk_iotsitewise::error::SdkError<E>> for TelemetryError
where
    E: std::error::Error + 'static,
{
    fn from(err: aws_sdk_iotsitewise::error::SdkError<E>) -> Self {
        TelemetryError::Service(aws_sdk_iotsitewise::error::DisplayErrorContext(&err).to_string())
    }
}

impl From<aws_sdk_iotsitewise::error::BuildError> for TelemetryError {
    fn from(err: aws_sdk_iotsitewise::error::BuildError) -> Self {
        TelemetryError::Request(err.to_string())
    }
}
