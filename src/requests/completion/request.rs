use super::{error::CompletionError, response::CompletionResponse};
use crate::{llms::ChatBackend, requests::req_components::ModelParams};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

/// One chat-completion call: role-tagged messages plus the generation parameters.
///
/// A request is sent exactly once. Failures are returned to the caller and are never retried
/// here; transport-level retry is opt-in on the API client.
pub struct CompletionRequest {
    pub start_time: std::time::Instant,
    pub messages: Vec<PromptMessage>,
    pub params: ModelParams,
    pub backend: std::sync::Arc<dyn ChatBackend>,
}

impl Clone for CompletionRequest {
    fn clone(&self) -> Self {
        Self {
            start_time: self.start_time,
            messages: self.messages.clone(),
            params: self.params.clone(),
            backend: std::sync::Arc::clone(&self.backend),
        }
    }
}

impl CompletionRequest {
    pub fn new(backend: std::sync::Arc<dyn ChatBackend>, params: ModelParams) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            messages: Vec::new(),
            params,
            backend,
        }
    }

    pub fn add_system_message<S: Into<String>>(&mut self, content: S) -> &mut Self {
        self.messages.push(PromptMessage {
            role: MessageRole::System,
            content: content.into(),
        });
        self
    }

    pub fn add_user_message<S: Into<String>>(&mut self, content: S) -> &mut Self {
        self.messages.push(PromptMessage {
            role: MessageRole::User,
            content: content.into(),
        });
        self
    }

    pub async fn request(&mut self) -> crate::Result<CompletionResponse, CompletionError> {
        if self.messages.is_empty() {
            return Err(CompletionError::RequestBuilderError(
                "a completion request needs at least one message".to_string(),
            ));
        }
        self.start_time = std::time::Instant::now();
        crate::debug!("{}", self);
        match self.backend.completion_request(self).await {
            Err(e) => {
                crate::error!(?e);
                Err(e)
            }
            Ok(res) => {
                crate::debug!("{}", res);
                Ok(res)
            }
        }
    }
}

impl std::fmt::Display for CompletionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "CompletionRequest:")?;
        writeln!(f, "  backend: {}", self.backend.name())?;
        writeln!(f, "  model: {}", self.params.model)?;
        writeln!(f, "  temperature: {}", self.params.temperature)?;
        for message in &self.messages {
            writeln!(f, "  {}: {:?}", message.role, message.content)?;
        }
        Ok(())
    }
}
