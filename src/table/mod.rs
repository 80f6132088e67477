mod adapter;
mod frame;

pub use adapter::{
    ClassifyTable, TableClassification, DEFAULT_DESCRIPTION_COLUMN, LONG_CATEGORY_COLUMN,
    PREDICTED_LABEL_COLUMN, PREDICTED_SCORE_COLUMN, PROBABILITY_COLUMN,
};
pub use frame::Table;
