use crate::error::PlotError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Read;

/// One record: column name -> scalar value, in column order.
pub type Row = Map<String, Value>;

/// An ordered sequence of rows sharing the same columns.
///
/// A dataset is never edited in place: loading or transposing swaps the whole
/// value in [`crate::runtime::PlotState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row that column discovery and type inference look at
    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Create a Dataset from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self, PlotError> {
        let array = value.as_array().ok_or_else(|| {
            PlotError::InvalidDataset("input data must be a JSON array of objects".to_string())
        })?;

        let mut rows = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item.as_object().ok_or_else(|| {
                PlotError::InvalidDataset(format!("item {} in array is not an object", idx))
            })?;

            for (key, val) in obj {
                if val.is_array() || val.is_object() {
                    return Err(PlotError::InvalidDataset(format!(
                        "unsupported value type for field '{}' in row {}",
                        key, idx
                    )));
                }
            }
            rows.push(obj.clone());
        }

        Ok(Self { rows })
    }

    pub fn from_json_str(input: &str) -> Result<Self, PlotError> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json(&value)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, PlotError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json(&value)
    }

    pub fn to_json_string(&self) -> Result<String, PlotError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}
