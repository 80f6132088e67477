use crate::requests::CompletionError;

/// Fatal outcomes of a classification run.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Detected before any network call: bad category set, missing column, invalid settings.
    #[error("ConfigurationError: {0}")]
    Configuration(String),
    /// A chat-completion call failed. The run stops at the first failure.
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl ClassifyError {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        crate::error!("{message}");
        ClassifyError::Configuration(message)
    }

    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            ClassifyError::Completion(CompletionError::Credential(_))
        )
    }
}

/// Non-fatal conditions reported next to a usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyWarning {
    /// The same label was supplied more than once and was merged.
    DuplicateCategories { labels: Vec<String> },
    /// A description column was asked for by name but the category table does not have it.
    MissingDescriptionColumn { column: String },
    /// Rows whose result could not be read as a probability distribution over the categories.
    DistributionFallback { rows: usize },
}

impl std::fmt::Display for ClassifyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyWarning::DuplicateCategories { labels } => write!(
                f,
                "duplicate category labels were merged, each keeping the position of its first occurrence and the last description given: {}",
                labels.join(", ")
            ),
            ClassifyWarning::MissingDescriptionColumn { column } => write!(
                f,
                "description column `{column}` not found, classifying without descriptions"
            ),
            ClassifyWarning::DistributionFallback { rows } => write!(
                f,
                "{rows} row(s) returned no usable probability distribution and were reported as a single top prediction"
            ),
        }
    }
}
