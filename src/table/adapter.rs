use super::frame::Table;
use crate::{
    classify::{
        drive, BatchConfig, BatchConfigTrait, Category, CategorySet, ClassifyError,
        ClassifyWarning, MatchRule, Normalized, RowClassifier, RowResult, TopPrediction,
        DEFAULT_CATEGORY_COLUMN,
    },
    llms::ChatBackend,
    requests::{ModelParams, ModelParamsTrait},
};
use serde_json::Value;
use std::{io::IsTerminal, sync::Arc};

pub const DEFAULT_DESCRIPTION_COLUMN: &str = "description";
pub const PREDICTED_LABEL_COLUMN: &str = "predicted_label";
pub const PREDICTED_SCORE_COLUMN: &str = "predicted_score";
pub const LONG_CATEGORY_COLUMN: &str = "category";
pub const PROBABILITY_COLUMN: &str = "probability";

/// Output of a table run plus every non-fatal warning raised on the way.
#[derive(Clone, Debug, PartialEq)]
pub struct TableClassification {
    pub table: Table,
    pub warnings: Vec<ClassifyWarning>,
    pub batches: usize,
    pub pauses: usize,
}

/// Builder for classifying a text column of a table. Created by
/// [`crate::LlmClassifier::classify_table`].
///
/// Wide output (the default) keeps one row per input row and appends `predicted_label` and
/// `predicted_score`. Long output, enabled with [`ClassifyTable::return_probabilities`], has one
/// row per input row and category with the `category` and `probability` columns appended.
pub struct ClassifyTable {
    backend: Arc<dyn ChatBackend>,
    params: ModelParams,
    batch: BatchConfig,
    data: Table,
    text_column: String,
    categories: Table,
    category_column: String,
    description_column: Option<String>,
    id_column: Option<String>,
    return_probabilities: bool,
    scored: bool,
    show_progress: bool,
}

impl ClassifyTable {
    pub(crate) fn new(
        backend: Arc<dyn ChatBackend>,
        params: ModelParams,
        batch: BatchConfig,
        data: Table,
        text_column: String,
        categories: Table,
    ) -> Self {
        Self {
            backend,
            params,
            batch,
            data,
            text_column,
            categories,
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            description_column: None,
            id_column: None,
            return_probabilities: false,
            scored: false,
            show_progress: std::io::stderr().is_terminal(),
        }
    }

    /// Column of the category table holding the labels. Defaults to `category`.
    pub fn category_column<S: Into<String>>(mut self, column: S) -> Self {
        self.category_column = column.into();
        self
    }

    /// Column of the category table holding descriptions.
    ///
    /// Without this, a `description` column is used when present. When set explicitly and not
    /// found, the run warns and goes on without descriptions.
    pub fn description_column<S: Into<String>>(mut self, column: S) -> Self {
        self.description_column = Some(column.into());
        self
    }

    /// Input column moved to the front of the output.
    pub fn id_column<S: Into<String>>(mut self, column: S) -> Self {
        self.id_column = Some(column.into());
        self
    }

    /// Ask for a full distribution per row and return long output.
    pub fn return_probabilities(mut self, return_probabilities: bool) -> Self {
        self.return_probabilities = return_probabilities;
        self
    }

    /// In wide output, ask for a distribution and report its arg-max instead of the plain label.
    pub fn scored(mut self, scored: bool) -> Self {
        self.scored = scored;
        self
    }

    /// Defaults to true when stderr is a terminal.
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run(self) -> crate::Result<TableClassification, ClassifyError> {
        let mut warnings = Vec::new();
        self.validate()?;
        let categories = self.category_set(&mut warnings)?;
        let texts = self.texts();
        let row = RowClassifier::new(Arc::clone(&self.backend), self.params.clone(), categories)?;
        let batch = BatchConfig {
            verbose: self.batch.verbose || self.show_progress,
            ..self.batch.clone()
        };

        crate::info!(
            rows = texts.len(),
            categories = row.categories().len(),
            long = self.return_probabilities,
            "classifying table"
        );
        let (table, batches, pauses) = if self.return_probabilities {
            let outcome = {
                let (row, texts) = (&row, &texts);
                drive(texts.len(), &batch, move |i| row.classify_detailed(&texts[i])).await?
            };
            let (table, fallbacks) = self.long_output(&row, &outcome.items)?;
            if fallbacks > 0 {
                let warning = ClassifyWarning::DistributionFallback { rows: fallbacks };
                crate::warn!("{warning}");
                warnings.push(warning);
            }
            (table, outcome.batches, outcome.pauses)
        } else {
            let outcome = {
                let (row, texts, scored) = (&row, &texts, self.scored);
                drive(texts.len(), &batch, move |i| async move {
                    if scored {
                        let top = row.classify_detailed(&texts[i]).await?.to_top_prediction();
                        Ok(on_list(row, top))
                    } else {
                        row.classify_scored(&texts[i]).await
                    }
                })
                .await?
            };
            (
                self.wide_output(&outcome.items)?,
                outcome.batches,
                outcome.pauses,
            )
        };

        let mut table = table;
        if let Some(id_column) = &self.id_column {
            table.relocate_first(id_column);
        }
        Ok(TableClassification {
            table,
            warnings,
            batches,
            pauses,
        })
    }

    fn validate(&self) -> crate::Result<(), ClassifyError> {
        if self.data.column_index(&self.text_column).is_none() {
            return Err(ClassifyError::configuration(format!(
                "text column `{}` not found in the input table",
                self.text_column
            )));
        }
        if self.categories.column_index(&self.category_column).is_none() {
            return Err(ClassifyError::configuration(format!(
                "category column `{}` not found in the category table",
                self.category_column
            )));
        }
        if let Some(id_column) = &self.id_column {
            if self.data.column_index(id_column).is_none() {
                return Err(ClassifyError::configuration(format!(
                    "id column `{id_column}` not found in the input table"
                )));
            }
        }
        let appended = if self.return_probabilities {
            [LONG_CATEGORY_COLUMN, PROBABILITY_COLUMN]
        } else {
            [PREDICTED_LABEL_COLUMN, PREDICTED_SCORE_COLUMN]
        };
        for column in appended {
            if self.data.column_index(column).is_some() {
                return Err(ClassifyError::configuration(format!(
                    "the input table already has a `{column}` column"
                )));
            }
        }
        Ok(())
    }

    fn category_set(
        &self,
        warnings: &mut Vec<ClassifyWarning>,
    ) -> crate::Result<CategorySet, ClassifyError> {
        let description_column = match &self.description_column {
            Some(column) if self.categories.column_index(column).is_some() => Some(column.as_str()),
            Some(column) => {
                let warning = ClassifyWarning::MissingDescriptionColumn {
                    column: column.clone(),
                };
                crate::warn!("{warning}");
                warnings.push(warning);
                None
            }
            None => self
                .categories
                .column_index(DEFAULT_DESCRIPTION_COLUMN)
                .map(|_| DEFAULT_DESCRIPTION_COLUMN),
        };

        let mut categories = Vec::with_capacity(self.categories.n_rows());
        for i in 0..self.categories.n_rows() {
            let label = match self.categories.cell(i, &self.category_column) {
                Some(Value::Null) | None => {
                    return Err(ClassifyError::configuration(format!(
                        "category row {i} has no label"
                    )))
                }
                Some(value) => cell_text(value),
            };
            let mut category = Category::new(label);
            if let Some(Value::String(description)) =
                description_column.and_then(|column| self.categories.cell(i, column))
            {
                category = category.with_description(description.clone());
            }
            categories.push(category);
        }

        let set = CategorySet::from_categories(categories)?;
        if !set.duplicate_labels().is_empty() {
            warnings.push(ClassifyWarning::DuplicateCategories {
                labels: set.duplicate_labels().to_vec(),
            });
        }
        Ok(set)
    }

    /// Missing texts go through the same path as empty ones.
    fn texts(&self) -> Vec<String> {
        self.data
            .column(&self.text_column)
            .unwrap_or_default()
            .into_iter()
            .map(|value| match value {
                Value::Null => String::new(),
                value => cell_text(value),
            })
            .collect()
    }

    fn wide_output(&self, predictions: &[TopPrediction]) -> crate::Result<Table, ClassifyError> {
        let mut table = Table::new(output_columns(
            &self.data,
            [PREDICTED_LABEL_COLUMN, PREDICTED_SCORE_COLUMN],
        ))?;
        for (input, prediction) in self.data.rows().iter().zip(predictions) {
            table.push_row(extend_row(input, prediction_cells(prediction)))?;
        }
        Ok(table)
    }

    fn long_output(
        &self,
        row: &RowClassifier,
        results: &[RowResult],
    ) -> crate::Result<(Table, usize), ClassifyError> {
        let mut table = Table::new(output_columns(
            &self.data,
            [LONG_CATEGORY_COLUMN, PROBABILITY_COLUMN],
        ))?;
        let mut fallbacks = 0;
        for (input, result) in self.data.rows().iter().zip(results) {
            let probabilities = result
                .to_distribution(&self.category_column)
                .and_then(|distribution| category_probabilities(row, &distribution));
            match probabilities {
                Some(probabilities) => {
                    for (label, probability) in probabilities {
                        table.push_row(extend_row(input, [Value::String(label), probability]))?;
                    }
                }
                None => {
                    fallbacks += 1;
                    let top = on_list(row, result.to_top_prediction());
                    table.push_row(extend_row(input, prediction_cells(&top)))?;
                }
            }
        }
        Ok((table, fallbacks))
    }
}

impl ModelParamsTrait for ClassifyTable {
    fn model_params_mut(&mut self) -> &mut ModelParams {
        &mut self.params
    }
}

impl BatchConfigTrait for ClassifyTable {
    fn batch_config_mut(&mut self) -> &mut BatchConfig {
        &mut self.batch
    }
}

/// Runs a reported label through the cascade so off-list labels never reach the output.
fn on_list(row: &RowClassifier, prediction: TopPrediction) -> TopPrediction {
    TopPrediction {
        label: prediction.label.map(|label| row.normalize(&label).label),
        score: prediction.score,
    }
}

/// One probability per category in set order, null where the reply has no matching key.
///
/// Keys match a label exactly or ignoring case, an exact key taking precedence. `None` when no
/// key names a category at all.
fn category_probabilities(
    row: &RowClassifier,
    distribution: &[(String, f64)],
) -> Option<Vec<(String, Value)>> {
    let matched: Vec<(Normalized, f64)> = distribution
        .iter()
        .filter_map(|(key, p)| row.match_key(key).map(|m| (m, *p)))
        .collect();
    if matched.is_empty() {
        return None;
    }
    let probabilities = row
        .categories()
        .labels()
        .map(|label| {
            let for_label = |rule: Option<MatchRule>| {
                matched
                    .iter()
                    .find(|(m, _)| m.label == label && rule.map_or(true, |rule| m.rule == rule))
            };
            let probability = for_label(Some(MatchRule::Exact))
                .or_else(|| for_label(None))
                .map_or(Value::Null, |(_, p)| number(*p));
            (label.to_string(), probability)
        })
        .collect();
    Some(probabilities)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn prediction_cells(prediction: &TopPrediction) -> [Value; 2] {
    [
        prediction
            .label
            .as_ref()
            .map_or(Value::Null, |label| Value::String(label.clone())),
        prediction.score.map_or(Value::Null, number),
    ]
}

fn output_columns(data: &Table, appended: [&str; 2]) -> Vec<String> {
    data.columns()
        .iter()
        .cloned()
        .chain(appended.iter().map(|column| column.to_string()))
        .collect()
}

fn extend_row(input: &[Value], appended: [Value; 2]) -> Vec<Value> {
    input.iter().cloned().chain(appended).collect()
}
