use super::{OpenAiBackend, OpenAiConfig};
use crate::{
    classify::{BatchConfig, BatchConfigTrait},
    config::ClassifierConfig,
    llms::api::{ApiConfig, LlmApiConfigTrait, RetryPolicy},
    logging::{LoggingConfig, LoggingConfigTrait},
    requests::{ModelParams, ModelParamsTrait},
    LlmClassifier,
};

pub const OPENROUTER_DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Configures an OpenAI-compatible backend and the classifier defaults that go with it.
#[derive(Default)]
pub struct OpenAiBackendBuilder {
    pub config: OpenAiConfig,
    pub params: ModelParams,
    pub batch: BatchConfig,
    pub retry: Option<RetryPolicy>,
}

impl OpenAiBackendBuilder {
    /// Preset for OpenRouter's OpenAI-compatible endpoint.
    pub fn openrouter() -> Self {
        Self {
            config: OpenAiConfig::openrouter(),
            params: ModelParams::new().model(OPENROUTER_DEFAULT_MODEL),
            ..Default::default()
        }
    }

    /// Retry 429 and 5xx responses with exponential backoff. Off by default.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_org_id<S: Into<String>>(mut self, org_id: S) -> Self {
        self.config = self.config.with_org_id(org_id);
        self
    }

    pub fn with_project_id<S: Into<String>>(mut self, project_id: S) -> Self {
        self.config = self.config.with_project_id(project_id);
        self
    }

    /// Applies a settings file on top of the preset.
    pub fn with_config(mut self, config: &ClassifierConfig) -> Self {
        self.params = config.apply_model_params(self.params);
        self.batch = config.batch_config();
        if let Some(retry) = config.retry_policy() {
            self.retry = Some(retry);
        }
        if let Some(host) = &config.api_host {
            self = self.with_api_host(host);
        }
        if let Some(env_var) = &config.api_key_env_var {
            self = self.with_api_key_env_var(env_var);
        }
        self.logging_enabled(config.logging_enabled)
    }

    /// Builds the backend. The API key is not read here: it is resolved on the first request.
    pub fn init(self) -> crate::Result<LlmClassifier> {
        let backend = OpenAiBackend::new(self.config, self.retry)?;
        Ok(LlmClassifier {
            backend: std::sync::Arc::new(backend),
            params: self.params,
            batch: self.batch,
        })
    }
}

impl LlmApiConfigTrait for OpenAiBackendBuilder {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig {
        &mut self.config.api_config
    }

    fn api_config(&self) -> &ApiConfig {
        &self.config.api_config
    }
}

impl ModelParamsTrait for OpenAiBackendBuilder {
    fn model_params_mut(&mut self) -> &mut ModelParams {
        &mut self.params
    }
}

impl BatchConfigTrait for OpenAiBackendBuilder {
    fn batch_config_mut(&mut self) -> &mut BatchConfig {
        &mut self.batch
    }
}

impl LoggingConfigTrait for OpenAiBackendBuilder {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig {
        &mut self.config.logging_config
    }
}
