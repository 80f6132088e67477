//! Process-wide API key storage backed by environment variables.
//!
//! Backends resolve their key lazily, on the first call that needs it: an explicit key set on the
//! builder wins, otherwise the configured environment variable is read (a `.env` file in the
//! working directory is loaded first). Nothing here persists past the current process.

use secrecy::Secret;

/// Environment variable read by the OpenAI backend when no key was passed explicitly.
pub const OPENAI_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
/// Environment variable read by the OpenRouter preset.
pub const OPENROUTER_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error(
        "no API key found: set the `{env_var}` environment variable (or add it to a .env file), or call `llm_classify::credentials::set_credential(\"{env_var}\", <key>)` before classifying"
    )]
    Missing { env_var: String },
}

/// Reads the API key stored in `env_var`.
///
/// Fails when the variable is unset or holds only whitespace.
pub fn get_credential(env_var: &str) -> Result<Secret<String>, CredentialError> {
    dotenvy::dotenv().ok();

    match dotenvy::var(env_var) {
        Ok(api_key) if !api_key.trim().is_empty() => {
            crate::trace!("Successfully loaded api_key from {env_var}");
            Ok(Secret::new(api_key))
        }
        _ => {
            crate::debug!("{env_var} not found in the environment or .env");
            Err(CredentialError::Missing {
                env_var: env_var.to_string(),
            })
        }
    }
}

/// Stores `api_key` in `env_var` for the rest of the process lifetime.
///
/// Mutates process-wide state; prefer passing the key to the backend builder with
/// [`crate::llms::api::LlmApiConfigTrait::with_api_key`].
pub fn set_credential<S: Into<String>>(env_var: &str, api_key: S) {
    std::env::set_var(env_var, api_key.into());
}
