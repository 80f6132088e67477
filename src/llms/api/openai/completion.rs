use crate::requests::{CompletionError, CompletionRequest, CompletionResponse, PromptMessage};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub(crate) struct OpenAiCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [PromptMessage],
    pub temperature: f32,
}

impl<'a> OpenAiCompletionRequest<'a> {
    pub(crate) fn new(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.params.model,
            messages: &request.messages,
            temperature: request.params.temperature,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct OpenAiCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct OpenAiChoice {
    pub message: OpenAiChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct OpenAiChoiceMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Completion content arrives as a plain string, or as a list of text fragments.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Fragments(Vec<ContentFragment>),
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum ContentFragment {
    Text(String),
    Part {
        #[serde(default)]
        text: Option<String>,
    },
}

impl MessageContent {
    pub(crate) fn concat(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Fragments(fragments) => fragments
                .iter()
                .filter_map(|fragment| match fragment {
                    ContentFragment::Text(text) => Some(text.as_str()),
                    ContentFragment::Part { text } => text.as_deref(),
                })
                .collect(),
        }
    }
}

impl CompletionResponse {
    pub(crate) fn new_from_openai(
        request: &CompletionRequest,
        res: OpenAiCompletionResponse,
    ) -> crate::Result<Self, CompletionError> {
        let choice = match res.choices.into_iter().next() {
            Some(choice) => choice,
            None => return Err(CompletionError::ResponseChoicesEmpty),
        };
        let content = choice
            .message
            .content
            .as_ref()
            .map(MessageContent::concat)
            .unwrap_or_default();
        Ok(Self {
            id: res.id,
            model: res.model,
            content,
            finish_reason: choice.finish_reason,
            score: None,
            duration: request.start_time.elapsed(),
        })
    }
}
