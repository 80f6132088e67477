//! Row classification, label normalization and paced batch runs.

mod batch;
mod categories;
mod error;
mod normalize;
mod prompt;
mod result;
mod row;

pub(crate) use batch::drive;
pub use batch::{BatchConfig, BatchConfigTrait, BatchOutcome, ClassifyVector};
pub use categories::{Category, CategorySet};
pub use error::{ClassifyError, ClassifyWarning};
pub use normalize::{LabelNormalizer, MatchRule, Normalized};
pub use result::{ProbabilitySource, RowResult, TopPrediction, DEFAULT_CATEGORY_COLUMN};
pub use row::{ClassifyOne, RowClassifier};
