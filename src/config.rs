//! Settings file for the classifier.
//!
//! ```yaml
//! model: gpt-4o-mini
//! temperature: 0.0
//! timeout_secs: 60
//! batch_size: 10
//! delay_secs: 1.5
//! api_key_env_var: OPENAI_API_KEY
//! retry:
//!   max_elapsed_secs: 30
//! ```
//!
//! Every key is optional.

use crate::{
    classify::BatchConfig,
    llms::RetryPolicy,
    requests::{ModelParams, ModelParamsTrait, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TEMPERATURE},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Falls back to the backend preset's model.
    pub model: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub batch_size: usize,
    pub delay_secs: f64,
    pub verbose: bool,
    pub api_host: Option<String>,
    pub api_key_env_var: Option<String>,
    /// Absent means no retry.
    pub retry: Option<RetryConfig>,
    pub logging_enabled: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            batch_size: 1,
            delay_secs: 0.0,
            verbose: false,
            api_host: None,
            api_key_env_var: None,
            retry: None,
            logging_enabled: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub max_elapsed_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            initial_interval_ms: policy.initial_interval.as_millis() as u64,
            max_interval_ms: policy.max_interval.as_millis() as u64,
            max_elapsed_secs: policy.max_elapsed_time.as_secs(),
        }
    }
}

impl ClassifierConfig {
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| crate::anyhow!("failed to read {}: {e}", path.display()))?;
        let config = Self::from_yaml_str(&yaml)?;
        crate::debug!("loaded classifier config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            crate::bail!("delay_secs must be a finite number >= 0, got {}", self.delay_secs);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            crate::bail!("temperature must be between 0 and 2, got {}", self.temperature);
        }
        if self.timeout_secs == 0 {
            crate::bail!("timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Applies the file's values over `params`. The model is only replaced when set.
    pub fn apply_model_params(&self, params: ModelParams) -> ModelParams {
        let params = params
            .temperature(self.temperature)
            .request_timeout(Duration::from_secs(self.timeout_secs));
        match &self.model {
            Some(model) => params.model(model),
            None => params,
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            batch_size: self.batch_size,
            delay: Duration::from_secs_f64(self.delay_secs),
            verbose: self.verbose,
        }
    }

    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        self.retry.as_ref().map(|retry| RetryPolicy {
            initial_interval: Duration::from_millis(retry.initial_interval_ms),
            max_interval: Duration::from_millis(retry.max_interval_ms),
            max_elapsed_time: Duration::from_secs(retry.max_elapsed_secs),
        })
    }
}
