pub mod builder;
pub(crate) mod completion;

use super::{
    client::{ApiClient, RetryPolicy},
    config::{ApiConfig, ApiConfigTrait},
    error::ClientError,
};
use crate::{
    credentials::{CredentialError, OPENAI_API_KEY_ENV_VAR, OPENROUTER_API_KEY_ENV_VAR},
    llms::ChatBackend,
    logging::LoggingConfig,
    requests::{CompletionError, CompletionRequest, CompletionResponse},
};
use completion::OpenAiCompletionRequest;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;

/// Default v1 API base url
pub const OPENAI_API_HOST: &str = "api.openai.com/v1";
/// OpenRouter speaks the same chat-completions protocol
pub const OPENROUTER_API_HOST: &str = "openrouter.ai/api/v1";
/// Organization header
pub const OPENAI_ORGANIZATION_HEADER: &str = "OpenAI-Organization";
/// Project header
pub const OPENAI_PROJECT_HEADER: &str = "OpenAI-Project";

/// Backend for OpenAI and any host serving the OpenAI chat-completions protocol.
pub struct OpenAiBackend {
    pub(crate) client: ApiClient<OpenAiConfig>,
}

impl OpenAiBackend {
    pub fn new(mut config: OpenAiConfig, retry: Option<RetryPolicy>) -> crate::Result<Self> {
        config.logging_config.load_logger()?;
        Ok(Self {
            client: ApiClient::new(config, retry)?,
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &str {
        &self.client.config.logging_config.logger_name
    }

    async fn completion_request(
        &self,
        request: &CompletionRequest,
    ) -> crate::Result<CompletionResponse, CompletionError> {
        match self
            .client
            .post(
                &self.client.config.completion_path,
                OpenAiCompletionRequest::new(request),
                request.params.timeout,
            )
            .await
        {
            Err(ClientError::Credential(e)) => Err(CompletionError::Credential(e)),
            Err(e) => Err(CompletionError::ClientError(e)),
            Ok(res) => CompletionResponse::new_from_openai(request, res),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_config: ApiConfig,
    pub logging_config: LoggingConfig,
    pub org_id: String,
    pub project_id: String,
    pub completion_path: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_config: ApiConfig {
                host: OPENAI_API_HOST.to_string(),
                port: None,
                api_key: None,
                api_key_env_var: OPENAI_API_KEY_ENV_VAR.to_string(),
            },
            logging_config: LoggingConfig {
                logger_name: "openai".to_string(),
                ..Default::default()
            },
            org_id: Default::default(),
            project_id: Default::default(),
            completion_path: "/chat/completions".to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn openrouter() -> Self {
        Self {
            api_config: ApiConfig {
                host: OPENROUTER_API_HOST.to_string(),
                port: None,
                api_key: None,
                api_key_env_var: OPENROUTER_API_KEY_ENV_VAR.to_string(),
            },
            logging_config: LoggingConfig {
                logger_name: "openrouter".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// To use a different organization id other than default
    pub fn with_org_id<S: Into<String>>(mut self, org_id: S) -> Self {
        self.org_id = org_id.into();
        self
    }

    /// Non default project id
    pub fn with_project_id<S: Into<String>>(mut self, project_id: S) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_completion_path<S: Into<String>>(mut self, path: S) -> Self {
        self.completion_path = path.into();
        self
    }
}

impl ApiConfigTrait for OpenAiConfig {
    fn headers(&self) -> crate::Result<HeaderMap, CredentialError> {
        let api_key = self.api_config.load_api_key()?;
        let mut headers = HeaderMap::new();

        if !self.org_id.is_empty() {
            if let Ok(header_value) = HeaderValue::from_str(self.org_id.as_str()) {
                headers.insert(OPENAI_ORGANIZATION_HEADER, header_value);
            } else {
                crate::error!("Failed to create header value from org_id value");
            }
        }
        if !self.project_id.is_empty() {
            if let Ok(header_value) = HeaderValue::from_str(self.project_id.as_str()) {
                headers.insert(OPENAI_PROJECT_HEADER, header_value);
            } else {
                crate::error!("Failed to create header value from project_id value");
            }
        }
        if let Ok(header_value) =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
        {
            headers.insert(AUTHORIZATION, header_value);
        } else {
            crate::error!("Failed to create header value from authorization value");
        }

        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_config.base_url(), path)
    }
}
