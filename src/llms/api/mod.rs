// Internal modules
mod client;
mod config;
mod error;

// Public modules
pub mod openai;

// Public exports
pub use client::RetryPolicy;
pub use config::{ApiConfig, LlmApiConfigTrait};
pub use error::{ApiError, ClientError};
