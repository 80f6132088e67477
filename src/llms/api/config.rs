use crate::credentials::{get_credential, CredentialError};
use reqwest::header::HeaderMap;
use secrecy::Secret;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Host and base path, e.g. `api.openai.com/v1`. A leading `http://` or `https://` is kept
    /// as given; otherwise `https://` is used.
    pub host: String,
    pub port: Option<String>,
    pub api_key: Option<Secret<String>>,
    pub api_key_env_var: String,
}

impl ApiConfig {
    /// Resolves the key for the next request: the explicit key if one was set, else the
    /// environment variable.
    pub(crate) fn load_api_key(&self) -> crate::Result<Secret<String>, CredentialError> {
        if let Some(api_key) = self.api_key.as_ref() {
            crate::trace!("Using api_key from parameter");
            return Ok(api_key.to_owned());
        }
        crate::trace!("api_key not set. Attempting to load from {}", self.api_key_env_var);
        get_credential(&self.api_key_env_var)
    }

    pub(crate) fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let (scheme, host) = if let Some(rest) = host.strip_prefix("http://") {
            ("http", rest)
        } else if let Some(rest) = host.strip_prefix("https://") {
            ("https", rest)
        } else {
            ("https", host)
        };
        match &self.port {
            Some(port) => match host.split_once('/') {
                Some((authority, path)) => format!("{scheme}://{authority}:{port}/{path}"),
                None => format!("{scheme}://{host}:{port}"),
            },
            None => format!("{scheme}://{host}"),
        }
    }
}

pub trait LlmApiConfigTrait {
    fn api_base_config_mut(&mut self) -> &mut ApiConfig;

    fn api_config(&self) -> &ApiConfig;

    fn with_api_host<S: AsRef<str>>(mut self, host: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().host = host.as_ref().to_string();
        self
    }

    fn with_api_port<S: AsRef<str>>(mut self, port: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().port = Some(port.as_ref().to_string());
        self
    }

    fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().api_key = Some(Secret::from(api_key.into()));
        self
    }

    /// Set the environment variable name for the API key. Default is set from the backend.
    fn with_api_key_env_var<S: Into<String>>(mut self, api_key_env_var: S) -> Self
    where
        Self: Sized,
    {
        self.api_base_config_mut().api_key_env_var = api_key_env_var.into();
        self
    }
}

pub(crate) trait ApiConfigTrait {
    /// Builds the request headers. Fails if no credential can be resolved.
    fn headers(&self) -> crate::Result<HeaderMap, CredentialError>;

    fn url(&self, path: &str) -> String;
}
