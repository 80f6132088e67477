use super::{
    categories::{Category, CategorySet},
    error::ClassifyError,
    normalize::{LabelNormalizer, Normalized},
    prompt,
    result::{RowResult, TopPrediction},
};
use crate::{
    llms::ChatBackend,
    requests::{CompletionRequest, CompletionResponse, ModelParams, ModelParamsTrait},
};
use std::{collections::HashMap, sync::Arc};

/// Classifies one text at a time against a fixed category set.
///
/// Every call is exactly one chat completion. Nothing is cached.
pub struct RowClassifier {
    backend: Arc<dyn ChatBackend>,
    params: ModelParams,
    normalizer: LabelNormalizer,
}

impl RowClassifier {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        params: ModelParams,
        categories: CategorySet,
    ) -> crate::Result<Self, ClassifyError> {
        Ok(Self {
            backend,
            params,
            normalizer: LabelNormalizer::new(categories)?,
        })
    }

    pub fn categories(&self) -> &CategorySet {
        self.normalizer.categories()
    }

    /// The normalized label for `text`.
    pub async fn classify(&self, text: &str) -> crate::Result<String, ClassifyError> {
        Ok(self.classify_normalized(text).await?.label)
    }

    pub async fn classify_normalized(&self, text: &str) -> crate::Result<Normalized, ClassifyError> {
        let response = self
            .complete(prompt::label_system_message(self.categories()), text)
            .await?;
        Ok(self.normalize(&response.content))
    }

    /// The normalized label together with whatever score the provider sent.
    pub async fn classify_scored(&self, text: &str) -> crate::Result<TopPrediction, ClassifyError> {
        let response = self
            .complete(prompt::label_system_message(self.categories()), text)
            .await?;
        Ok(TopPrediction {
            label: Some(self.normalize(&response.content).label),
            score: response.score,
        })
    }

    /// Asks for a probability per label.
    ///
    /// A reply that is not structured is run through the label cascade and returned as a
    /// [`RowResult::Prediction`].
    pub async fn classify_detailed(&self, text: &str) -> crate::Result<RowResult, ClassifyError> {
        let response = self
            .complete(prompt::distribution_system_message(self.categories()), text)
            .await?;
        match RowResult::from_reply(&response.content) {
            Some(result) => Ok(result),
            None => {
                crate::debug!("reply is not a structured result, using the label cascade");
                Ok(RowResult::Prediction(TopPrediction {
                    label: Some(self.normalize(&response.content).label),
                    score: response.score,
                }))
            }
        }
    }

    pub fn match_key(&self, key: &str) -> Option<Normalized> {
        self.normalizer.match_key(key)
    }

    pub fn normalize(&self, reply: &str) -> Normalized {
        let normalized = self.normalizer.normalize(reply);
        crate::debug!(
            reply,
            label = %normalized.label,
            rule = %normalized.rule,
            "normalized reply"
        );
        normalized
    }

    async fn complete(
        &self,
        system_message: String,
        text: &str,
    ) -> crate::Result<CompletionResponse, ClassifyError> {
        let mut request = CompletionRequest::new(Arc::clone(&self.backend), self.params.clone());
        request
            .add_system_message(system_message)
            .add_user_message(prompt::user_message(text, self.categories()));
        Ok(request.request().await?)
    }
}

/// Builder for a single classification. Created by [`crate::LlmClassifier::classify_one`].
pub struct ClassifyOne {
    backend: Arc<dyn ChatBackend>,
    params: ModelParams,
    text: String,
    categories: Vec<Category>,
    descriptions: HashMap<String, String>,
}

impl ClassifyOne {
    pub(crate) fn new(
        backend: Arc<dyn ChatBackend>,
        params: ModelParams,
        text: String,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            backend,
            params,
            text,
            categories,
            descriptions: HashMap::new(),
        }
    }

    /// Descriptions by label, added to the prompt.
    pub fn descriptions(mut self, descriptions: HashMap<String, String>) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub async fn run(self) -> crate::Result<String, ClassifyError> {
        let categories =
            CategorySet::from_categories(self.categories)?.with_descriptions(&self.descriptions);
        RowClassifier::new(self.backend, self.params, categories)?
            .classify(&self.text)
            .await
    }
}

impl ModelParamsTrait for ClassifyOne {
    fn model_params_mut(&mut self) -> &mut ModelParams {
        &mut self.params
    }
}
