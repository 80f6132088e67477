use crate::table::Table;
use serde_json::Value;

pub const DEFAULT_CATEGORY_COLUMN: &str = "category";
const LABEL_COLUMN: &str = "label";
const SCORE_COLUMN: &str = "score";

/// Label plus an opaque confidence. Either may be unknown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopPrediction {
    pub label: Option<String>,
    pub score: Option<f64>,
}

/// Numeric weights per category, as delivered by the model.
#[derive(Clone, Debug, PartialEq)]
pub enum ProbabilitySource {
    /// Label to weight, in the order the entries were received. Ties in the arg-max go to the
    /// earliest entry.
    Mapping(Vec<(String, f64)>),
    /// Parallel vectors of names and weights.
    Named { names: Vec<String>, values: Vec<f64> },
}

/// Everything one row of a detailed classification can come back as.
#[derive(Clone, Debug, PartialEq)]
pub enum RowResult {
    Prediction(TopPrediction),
    Distribution(ProbabilitySource),
    Frame(Table),
}

impl RowResult {
    /// Reads a model reply as JSON. Code fences are stripped first.
    ///
    /// Accepted shapes:
    /// - `{"label": "dog", "score": 0.9}`
    /// - `{"cat": 0.2, "dog": 0.7}`
    /// - `{"names": ["cat", "dog"], "values": [0.2, 0.7]}`
    /// - `[{"category": "cat", "probability": 0.2}, ...]`
    pub fn from_reply(reply: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(strip_code_fence(reply)).ok()?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(object) => {
                if let Some(Value::String(label)) = object.get(LABEL_COLUMN) {
                    return Some(RowResult::Prediction(TopPrediction {
                        label: Some(label.clone()),
                        score: object.get(SCORE_COLUMN).and_then(Value::as_f64),
                    }));
                }
                if let (Some(Value::Array(names)), Some(Value::Array(values))) =
                    (object.get("names"), object.get("values"))
                {
                    let names: Option<Vec<String>> = names
                        .iter()
                        .map(|name| name.as_str().map(str::to_string))
                        .collect();
                    let values: Option<Vec<f64>> = values.iter().map(Value::as_f64).collect();
                    return Some(RowResult::Distribution(ProbabilitySource::Named {
                        names: names?,
                        values: values?,
                    }));
                }
                let entries: Option<Vec<(String, f64)>> = object
                    .iter()
                    .map(|(key, weight)| weight.as_f64().map(|weight| (key.clone(), weight)))
                    .collect();
                match entries {
                    Some(entries) if !entries.is_empty() => Some(RowResult::Distribution(
                        ProbabilitySource::Mapping(entries),
                    )),
                    _ => None,
                }
            }
            Value::Array(records) if !records.is_empty() => {
                Table::from_records(records).map(RowResult::Frame)
            }
            _ => None,
        }
    }

    /// (i) explicit pair, (ii) arg-max over a distribution, (iii) a single-row table with a
    /// `label` column, (iv) unknown.
    pub fn to_top_prediction(&self) -> TopPrediction {
        match self {
            RowResult::Prediction(prediction) => prediction.clone(),
            RowResult::Distribution(source) => source
                .entries()
                .and_then(|entries| arg_max(&entries))
                .unwrap_or_default(),
            RowResult::Frame(table) if table.n_rows() == 1 => {
                match table.cell(0, LABEL_COLUMN).and_then(Value::as_str) {
                    Some(label) => TopPrediction {
                        label: Some(label.to_string()),
                        score: table.cell(0, SCORE_COLUMN).and_then(Value::as_f64),
                    },
                    None => TopPrediction::default(),
                }
            }
            RowResult::Frame(_) => TopPrediction::default(),
        }
    }

    /// Coerces the result to `(category, probability)` pairs.
    ///
    /// Tables must have exactly two columns, one of them named `category_column` or `category`.
    /// `None` means the row cannot be reported as a distribution.
    pub fn to_distribution(&self, category_column: &str) -> Option<Vec<(String, f64)>> {
        match self {
            RowResult::Prediction(_) => None,
            RowResult::Distribution(source) => source.entries(),
            RowResult::Frame(table) => table_distribution(table, category_column),
        }
    }
}

impl ProbabilitySource {
    fn entries(&self) -> Option<Vec<(String, f64)>> {
        match self {
            ProbabilitySource::Mapping(entries) => Some(entries.clone()),
            ProbabilitySource::Named { names, values } if names.len() == values.len() => {
                Some(names.iter().cloned().zip(values.iter().copied()).collect())
            }
            ProbabilitySource::Named { .. } => None,
        }
    }
}

fn arg_max(entries: &[(String, f64)]) -> Option<TopPrediction> {
    let mut best: Option<&(String, f64)> = None;
    for entry in entries {
        if best.map_or(true, |(_, weight)| entry.1 > *weight) {
            best = Some(entry);
        }
    }
    best.map(|(label, weight)| TopPrediction {
        label: Some(label.clone()),
        score: Some(*weight),
    })
}

fn table_distribution(table: &Table, category_column: &str) -> Option<Vec<(String, f64)>> {
    if table.n_cols() != 2 {
        return None;
    }
    let key_index = table
        .column_index(category_column)
        .or_else(|| table.column_index(DEFAULT_CATEGORY_COLUMN))?;
    let value_index = 1 - key_index;
    table
        .rows()
        .iter()
        .map(|row| Some((row[key_index].as_str()?.to_string(), row[value_index].as_f64()?)))
        .collect()
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop an info string such as `json`.
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim_start().starts_with(['{', '[']) => {
            inner[newline + 1..].trim()
        }
        _ => inner.trim(),
    }
}
