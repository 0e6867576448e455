// Column discovery and X/Y selection

use crate::data::Dataset;
use crate::error::PlotError;

/// The pair of columns a chart is drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub x: String,
    pub y: String,
}

impl ColumnSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Column names of the dataset, taken from the keys of the first row in order
pub fn derive_columns(dataset: &Dataset) -> Result<Vec<String>, PlotError> {
    let first = dataset.first_row().ok_or(PlotError::EmptyDataset)?;
    Ok(first.keys().cloned().collect())
}

/// First two columns in discovery order, or nothing when fewer than two exist
pub fn default_selection(columns: &[String]) -> Option<ColumnSelection> {
    match columns {
        [x, y, ..] => Some(ColumnSelection::new(x.clone(), y.clone())),
        _ => None,
    }
}

/// Available columns plus the current X/Y choice.
///
/// This is the model behind the two column pickers: both list every entry of
/// `columns()` in order and show `x()`/`y()` as selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRegistry {
    columns: Vec<String>,
    x: Option<String>,
    y: Option<String>,
}

impl ColumnRegistry {
    /// Derive columns and the default selection. An empty dataset yields an
    /// empty registry rather than an error.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let columns = match derive_columns(dataset) {
            Ok(columns) => columns,
            Err(err) => {
                tracing::debug!("no columns derived: {}", err);
                Vec::new()
            }
        };

        let selection = default_selection(&columns);
        tracing::debug!(columns = columns.len(), ?selection, "derived columns");

        Self {
            x: selection.as_ref().map(|s| s.x.clone()),
            y: selection.map(|s| s.y),
            columns,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn x(&self) -> Option<&str> {
        self.x.as_deref()
    }

    pub fn y(&self) -> Option<&str> {
        self.y.as_deref()
    }

    /// The current selection, present only when both axes are chosen
    pub fn selection(&self) -> Option<ColumnSelection> {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => Some(ColumnSelection::new(x.clone(), y.clone())),
            _ => None,
        }
    }

    pub fn select_x(&mut self, column: &str) -> Result<(), PlotError> {
        self.x = Some(self.checked(column)?);
        Ok(())
    }

    pub fn select_y(&mut self, column: &str) -> Result<(), PlotError> {
        self.y = Some(self.checked(column)?);
        Ok(())
    }

    fn checked(&self, column: &str) -> Result<String, PlotError> {
        if self.contains(column) {
            Ok(column.to_string())
        } else {
            Err(PlotError::MissingColumn(column.to_string()))
        }
    }
}
