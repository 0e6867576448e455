// Chart kind / column type compatibility

use crate::classify::ColumnType;
use crate::error::PlotError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const SUCCESS_MESSAGE: &str = "Plot generated successfully!";
pub const CATEGORICAL_X_ADVICE: &str = "Warning: Bar and Box plots are best for comparing numerical data across categories. Try selecting a non-numeric column for the X-axis.";
pub const NUMERIC_AXES_ADVICE: &str = "Warning: Scatter plots are best for comparing two numerical variables. Try selecting numerical columns for both axes.";

/// Supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Bar,
    Box,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Scatter, ChartKind::Bar, ChartKind::Box];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Bar => "bar",
            ChartKind::Box => "box",
        }
    }

    /// Prefix used for the chart title
    pub fn title_prefix(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Box => "Box Plot",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scatter" => Ok(ChartKind::Scatter),
            "bar" => Ok(ChartKind::Bar),
            "box" => Ok(ChartKind::Box),
            other => Err(PlotError::UnknownChartKind(other.to_string())),
        }
    }
}

/// Advisory outcome of a compatibility check. Never blocks plotting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_compatible: bool,
    pub message: String,
}

impl ValidationResult {
    fn compatible() -> Self {
        Self {
            is_compatible: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    fn incompatible(message: &str) -> Self {
        Self {
            is_compatible: false,
            message: message.to_string(),
        }
    }
}

/// Check whether the column types make sense for the chart kind.
///
/// Bar and box charts want a categorical axis somewhere, so two numeric
/// columns are flagged. Scatter plots want both axes numeric.
pub fn validate(kind: ChartKind, x_type: ColumnType, y_type: ColumnType) -> ValidationResult {
    let both_numeric = x_type == ColumnType::Numeric && y_type == ColumnType::Numeric;

    match kind {
        ChartKind::Bar | ChartKind::Box if both_numeric => {
            ValidationResult::incompatible(CATEGORICAL_X_ADVICE)
        }
        ChartKind::Bar | ChartKind::Box => ValidationResult::compatible(),
        ChartKind::Scatter if both_numeric => ValidationResult::compatible(),
        ChartKind::Scatter => ValidationResult::incompatible(NUMERIC_AXES_ADVICE),
    }
}
