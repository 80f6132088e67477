use crate::classify::ClassifyError;
use serde_json::Value;

/// A small column-oriented table of JSON cells.
///
/// Used both for caller input (texts, category definitions) and for classification output.
/// Column names are unique; every row has one cell per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> crate::Result<Self, ClassifyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rows(columns, Vec::new())
    }

    pub fn with_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> crate::Result<Self, ClassifyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(ClassifyError::configuration(format!(
                    "duplicate column name `{column}`"
                )));
            }
        }
        let mut table = Self {
            columns,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Builds a table from JSON objects. Columns are the union of keys, in first-seen order;
    /// absent keys become null. Returns `None` unless every record is an object.
    pub fn from_records(records: &[Value]) -> Option<Self> {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.as_object()?.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .iter()
            .filter_map(Value::as_object)
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Some(Self { columns, rows })
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> crate::Result<(), ClassifyError> {
        if row.len() != self.columns.len() {
            return Err(ClassifyError::configuration(format!(
                "row {} has {} cells but the table has {} columns",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Value> {
        let index = self.column_index(name)?;
        self.rows.get(row).map(|row| &row[index])
    }

    /// Moves `name` to the first position. Returns false if there is no such column.
    pub fn relocate_first(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        if index > 0 {
            let column = self.columns.remove(index);
            self.columns.insert(0, column);
            for row in &mut self.rows {
                let cell = row.remove(index);
                row.insert(0, cell);
            }
        }
        true
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                Value::Object(
                    self.columns
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned())
                        .collect(),
                )
            })
            .collect()
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.columns.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Value::String(s) => s.clone(),
                    Value::Null => "NA".to_string(),
                    other => other.to_string(),
                })
                .collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}
