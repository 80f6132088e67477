use crate::credentials::CredentialError;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Underlying error from reqwest library after an API call was made
    #[error("http error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// API returns error object with details of API call failure
    #[error("{}", .0)]
    ApiError(ApiError),
    /// Non-2xx status whose body is not a structured error object
    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// No API key could be resolved before sending the request
    #[error("{0}")]
    Credential(#[from] CredentialError),
    /// Error when a request cannot be serialized
    #[error("failed to serialize api request: {0}")]
    JSONSerialize(serde_json::Error),
    /// Error when a response cannot be deserialized into a Rust type
    #[error("failed to deserialize api response: {0}")]
    JSONDeserialize(serde_json::Error),
}

impl ClientError {
    /// Rate limits and server-side failures. Only consulted when retry is enabled.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            ClientError::Reqwest(e) => e.is_timeout() || e.is_connect(),
            ClientError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            ClientError::ApiError(e) => {
                e.status.is_some_and(|s| s == 429 || s >= 500)
                    && e.r#type.as_deref() != Some("insufficient_quota")
            }
            _ => false,
        }
    }
}

/// Wrapper to deserialize the error object nested in "error" JSON key
#[derive(Debug, Deserialize)]
pub(crate) struct WrappedError {
    pub(crate) error: ApiError,
}

pub(crate) fn map_deserialization_error(e: serde_json::Error, bytes: &[u8]) -> ClientError {
    crate::error!(
        "failed deserialization of: {}",
        String::from_utf8_lossy(bytes)
    );
    ClientError::JSONDeserialize(e)
}

pub(crate) fn map_serialization_error(e: serde_json::Error) -> ClientError {
    crate::error!("failed serialization: {}", e);
    ClientError::JSONSerialize(e)
}

/// Structured error reported by the provider, either with a non-2xx status or inside a 2xx body.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    /// OpenAI sends a string here, OpenRouter a number.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// HTTP status the error arrived with. Filled in by the client, not the provider.
    #[serde(skip)]
    pub status: Option<u16>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.r#type, self.status) {
            (Some(kind), Some(status)) => {
                write!(f, "provider error ({status}, {kind}): {}", self.message)
            }
            (Some(kind), None) => write!(f, "provider error ({kind}): {}", self.message),
            (None, Some(status)) => write!(f, "provider error ({status}): {}", self.message),
            (None, None) => write!(f, "provider error: {}", self.message),
        }
    }
}
