// Public modules
pub mod completion;
pub mod req_components;

// Public exports
pub use completion::{
    CompletionError, CompletionRequest, CompletionResponse, MessageRole, PromptMessage,
};
pub use req_components::{
    ModelParams, ModelParamsTrait, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TEMPERATURE,
};
