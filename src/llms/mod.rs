// Public modules
pub mod api;

// Internal imports
use crate::requests::{CompletionError, CompletionRequest, CompletionResponse};

// Public exports
pub use api::{
    openai::{builder::OpenAiBackendBuilder, OpenAiBackend, OpenAiConfig},
    ApiConfig, ApiError, ClientError, LlmApiConfigTrait, RetryPolicy,
};

/// The chat-completion collaborator.
///
/// Implementors own transport, serialization and credentials. The classifier only ever sends a
/// system message and a user message and reads back the text of the first choice.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn completion_request(
        &self,
        request: &CompletionRequest,
    ) -> crate::Result<CompletionResponse, CompletionError>;
}
