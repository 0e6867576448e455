use crate::data::Dataset;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Inferred kind of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

/// Classify `column` by the value it holds in the first row only.
///
/// A number is Numeric; strings, booleans, null, a missing key and an empty
/// dataset are all Categorical. Later rows are never inspected, so a column
/// whose first value is not a number is Categorical even if the rest are.
pub fn classify(dataset: &Dataset, column: &str) -> ColumnType {
    match dataset.first_row().and_then(|row| row.get(column)) {
        Some(Value::Number(_)) => ColumnType::Numeric,
        _ => ColumnType::Categorical,
    }
}
