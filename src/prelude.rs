pub use crate::{
    classify::{
        BatchConfig, BatchConfigTrait, BatchOutcome, Category, CategorySet, ClassifyError,
        ClassifyWarning, RowResult, TopPrediction,
    },
    config::ClassifierConfig,
    credentials::{get_credential, set_credential},
    llms::{ChatBackend, LlmApiConfigTrait, RetryPolicy},
    logging::LoggingConfigTrait,
    requests::{CompletionError, ModelParams, ModelParamsTrait},
    table::{Table, TableClassification},
    LlmClassifier,
};
