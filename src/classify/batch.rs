use super::{
    categories::{Category, CategorySet},
    error::ClassifyError,
    row::RowClassifier,
};
use crate::{
    llms::ChatBackend,
    requests::{ModelParams, ModelParamsTrait},
};
use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

/// Pacing for runs over many texts.
///
/// Texts are grouped into chunks of `batch_size` for pacing only; every text is still its own
/// request. After each chunk but the last the run sleeps for `delay`.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub delay: Duration,
    /// Log a progress line for every classified text.
    pub verbose: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            delay: Duration::ZERO,
            verbose: false,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Default::default()
    }

    fn chunk_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

pub trait BatchConfigTrait {
    fn batch_config_mut(&mut self) -> &mut BatchConfig;

    /// Number of texts per pacing chunk. `0` and `1` mean no pacing.
    fn batch_size(mut self, batch_size: usize) -> Self
    where
        Self: Sized,
    {
        self.batch_config_mut().batch_size = batch_size;
        self
    }

    /// Pause between chunks. Only applies when `batch_size > 1`.
    fn delay(mut self, delay: Duration) -> Self
    where
        Self: Sized,
    {
        self.batch_config_mut().delay = delay;
        self
    }

    fn verbose(mut self, verbose: bool) -> Self
    where
        Self: Sized,
    {
        self.batch_config_mut().verbose = verbose;
        self
    }
}

impl BatchConfigTrait for BatchConfig {
    fn batch_config_mut(&mut self) -> &mut BatchConfig {
        self
    }
}

/// Results of a paced run, in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchOutcome<T> {
    pub items: Vec<T>,
    pub batches: usize,
    /// Inter-batch pauses taken. Never counts a pause after the last chunk.
    pub pauses: usize,
}

/// Calls `classify` once per index in `0..len`, strictly one at a time and in order.
///
/// The first error ends the run and is returned; results gathered so far are dropped.
pub(crate) async fn drive<T, F, Fut>(
    len: usize,
    config: &BatchConfig,
    mut classify: F,
) -> crate::Result<BatchOutcome<T>, ClassifyError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = crate::Result<T, ClassifyError>>,
{
    let chunk_size = config.chunk_size();
    let paced = config.batch_size > 1;
    let mut outcome = BatchOutcome {
        items: Vec::with_capacity(len),
        batches: 0,
        pauses: 0,
    };

    let mut start = 0;
    while start < len {
        let end = (start + chunk_size).min(len);
        outcome.batches += 1;
        if paced {
            crate::trace!(batch = outcome.batches, start, end, "starting batch");
        }
        for index in start..end {
            outcome.items.push(classify(index).await?);
            if config.verbose {
                crate::info!("classified {}/{}", index + 1, len);
            }
        }
        start = end;
        if paced && start < len {
            outcome.pauses += 1;
            if !config.delay.is_zero() {
                crate::debug!("batch {} done, waiting {:?}", outcome.batches, config.delay);
                tokio::time::sleep(config.delay).await;
            }
        }
    }
    Ok(outcome)
}

/// Builder for classifying a list of texts. Created by
/// [`crate::LlmClassifier::classify_vector`].
pub struct ClassifyVector {
    backend: Arc<dyn ChatBackend>,
    params: ModelParams,
    batch: BatchConfig,
    texts: Vec<String>,
    categories: Vec<Category>,
    descriptions: HashMap<String, String>,
}

impl ClassifyVector {
    pub(crate) fn new(
        backend: Arc<dyn ChatBackend>,
        params: ModelParams,
        batch: BatchConfig,
        texts: Vec<String>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            backend,
            params,
            batch,
            texts,
            categories,
            descriptions: HashMap::new(),
        }
    }

    pub fn descriptions(mut self, descriptions: HashMap<String, String>) -> Self {
        self.descriptions = descriptions;
        self
    }

    /// One label per input text, index-aligned.
    pub async fn run(self) -> crate::Result<Vec<String>, ClassifyError> {
        Ok(self.run_detailed().await?.items)
    }

    pub async fn run_detailed(self) -> crate::Result<BatchOutcome<String>, ClassifyError> {
        let categories =
            CategorySet::from_categories(self.categories)?.with_descriptions(&self.descriptions);
        let row = RowClassifier::new(self.backend, self.params, categories)?;
        let texts = &self.texts;
        let row = &row;

        crate::info!(
            texts = texts.len(),
            batch_size = self.batch.batch_size,
            "classifying texts"
        );
        let outcome = drive(texts.len(), &self.batch, move |i| row.classify(&texts[i])).await?;
        crate::info!(
            batches = outcome.batches,
            pauses = outcome.pauses,
            "classification finished"
        );
        Ok(outcome)
    }
}

impl ModelParamsTrait for ClassifyVector {
    fn model_params_mut(&mut self) -> &mut ModelParams {
        &mut self.params
    }
}

impl BatchConfigTrait for ClassifyVector {
    fn batch_config_mut(&mut self) -> &mut BatchConfig {
        &mut self.batch
    }
}
