//! Classify free text into a closed set of labels with a chat-completion model.
//!
//! ```no_run
//! # async fn run() -> llm_classify::Result<()> {
//! use llm_classify::prelude::*;
//!
//! let classifier = LlmClassifier::openai().batch_size(10).init()?;
//! let labels = classifier
//!     .classify_vector(["siamese kitty", "golden retriever"], ["cat", "dog"])
//!     .run()
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod credentials;
pub mod llms;
pub mod logging;
pub mod prelude;
pub mod requests;
pub mod table;

#[allow(unused_imports)]
pub(crate) use anyhow::{anyhow, bail, Error};
pub use anyhow::Result;
#[allow(unused_imports)]
pub(crate) use tracing::{debug, error, info, span, trace, warn, Level};

use classify::{BatchConfig, BatchConfigTrait, Category, ClassifyOne, ClassifyVector};
use llms::{ChatBackend, OpenAiBackendBuilder};
use requests::{ModelParams, ModelParamsTrait};
use std::sync::Arc;
use table::{ClassifyTable, Table};

/// Entry point: a backend plus the default model and pacing settings for every run.
///
/// Build one per process (or per test) and share it. The request builders it returns copy the
/// defaults, so per-call overrides never leak back.
#[derive(Clone)]
pub struct LlmClassifier {
    pub backend: Arc<dyn ChatBackend>,
    pub params: ModelParams,
    pub batch: BatchConfig,
}

impl LlmClassifier {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            params: ModelParams::default(),
            batch: BatchConfig::default(),
        }
    }

    /// Creates a new instance of the [`OpenAiBackendBuilder`]. It is converted to an
    /// `LlmClassifier` with the `init` method.
    pub fn openai() -> OpenAiBackendBuilder {
        OpenAiBackendBuilder::default()
    }

    /// Same as [`LlmClassifier::openai`] with OpenRouter's host, key variable and model naming.
    pub fn openrouter() -> OpenAiBackendBuilder {
        OpenAiBackendBuilder::openrouter()
    }

    pub fn classify_one<S, I, L>(&self, text: S, categories: I) -> ClassifyOne
    where
        S: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        ClassifyOne::new(
            Arc::clone(&self.backend),
            self.params.clone(),
            text.into(),
            to_categories(categories),
        )
    }

    pub fn classify_vector<T, S, I, L>(&self, texts: T, categories: I) -> ClassifyVector
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        ClassifyVector::new(
            Arc::clone(&self.backend),
            self.params.clone(),
            self.batch.clone(),
            texts.into_iter().map(Into::into).collect(),
            to_categories(categories),
        )
    }

    /// `categories` needs a label column (`category` unless renamed) and may carry descriptions.
    pub fn classify_table<S: Into<String>>(
        &self,
        data: Table,
        text_column: S,
        categories: Table,
    ) -> ClassifyTable {
        ClassifyTable::new(
            Arc::clone(&self.backend),
            self.params.clone(),
            self.batch.clone(),
            data,
            text_column.into(),
            categories,
        )
    }
}

impl ModelParamsTrait for LlmClassifier {
    fn model_params_mut(&mut self) -> &mut ModelParams {
        &mut self.params
    }
}

impl BatchConfigTrait for LlmClassifier {
    fn batch_config_mut(&mut self) -> &mut BatchConfig {
        &mut self.batch
    }
}

fn to_categories<I, L>(labels: I) -> Vec<Category>
where
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    labels.into_iter().map(Category::new).collect()
}
