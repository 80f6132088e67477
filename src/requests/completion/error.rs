use crate::{credentials::CredentialError, llms::api::ClientError};

/// Failures of a single chat-completion call. Every variant is fatal for a classification run.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("RequestBuilderError: {0}")]
    RequestBuilderError(String),
    #[error("ClientError: {0}")]
    ClientError(#[from] ClientError),
    #[error("CredentialError: {0}")]
    Credential(#[from] CredentialError),
    #[error("ResponseChoicesEmpty: the response contained no choices")]
    ResponseChoicesEmpty,
    /// Errors raised by backends that are not HTTP clients, e.g. scripted backends in tests.
    #[error("BackendError: {0}")]
    BackendError(String),
}
