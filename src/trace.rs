// Projection of a dataset onto an x/y series

use crate::columns::derive_columns;
use crate::data::Dataset;
use crate::error::PlotError;
use crate::validate::ChartKind;
use serde::Serialize;
use serde_json::Value;

/// How the renderer should draw the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    /// One marker per row
    Markers,
    /// Aggregate bars per x position
    Bar,
    /// Aggregate box summaries per x position
    Box,
}

impl TraceMode {
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Scatter => TraceMode::Markers,
            ChartKind::Bar => TraceMode::Bar,
            ChartKind::Box => TraceMode::Box,
        }
    }

    fn is_aggregate(&self) -> bool {
        !matches!(self, TraceMode::Markers)
    }
}

/// A single series ready for rendering; `x` and `y` are parallel, in row order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSpec {
    pub x: Vec<Value>,
    pub y: Vec<Value>,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "TraceMode::is_aggregate")]
    pub mode: TraceMode,
    pub name: String,
}

pub fn series_name(x_column: &str, y_column: &str) -> String {
    format!("{} vs {}", x_column, y_column)
}

/// Build the trace for `kind` from two columns of `dataset`.
///
/// Column presence is checked once against the first row. A later row
/// without the key contributes `null` at its position.
pub fn build_trace(
    dataset: &Dataset,
    x_column: &str,
    y_column: &str,
    kind: ChartKind,
) -> Result<TraceSpec, PlotError> {
    let columns = derive_columns(dataset).unwrap_or_default();
    for column in [x_column, y_column] {
        if !columns.iter().any(|c| c == column) {
            return Err(PlotError::MissingColumn(column.to_string()));
        }
    }

    let project = |column: &str| -> Vec<Value> {
        dataset
            .rows()
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
            .collect()
    };

    Ok(TraceSpec {
        x: project(x_column),
        y: project(y_column),
        kind,
        mode: TraceMode::for_kind(kind),
        name: series_name(x_column, y_column),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pets() -> Dataset {
        Dataset::from_json(&json!([{"a": 1, "b": "cat"}, {"a": 2, "b": "dog"}])).unwrap()
    }

    #[test]
    fn test_projection_same_for_all_kinds() {
        for kind in ChartKind::ALL {
            let trace = build_trace(&pets(), "a", "b", kind).unwrap();
            assert_eq!(trace.x, vec![json!(1), json!(2)]);
            assert_eq!(trace.y, vec![json!("cat"), json!("dog")]);
            assert_eq!(trace.name, "a vs b");
            assert_eq!(trace.kind, kind);
            assert_eq!(trace.mode, TraceMode::for_kind(kind));
        }
    }

    #[test]
    fn test_missing_column() {
        let err = build_trace(&pets(), "a", "zzz", ChartKind::Bar).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(ref c) if c == "zzz"));

        let err = build_trace(&Dataset::default(), "a", "b", ChartKind::Bar).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn(ref c) if c == "a"));
    }

    #[test]
    fn test_ragged_row_yields_null() {
        let data = Dataset::from_json(&json!([{"a": 1, "b": 2}, {"a": 3}])).unwrap();
        let trace = build_trace(&data, "a", "b", ChartKind::Scatter).unwrap();
        assert_eq!(trace.x.len(), 2);
        assert_eq!(trace.y, vec![json!(2), Value::Null]);
    }

    #[test]
    fn test_trace_json_shape() {
        let scatter = build_trace(&pets(), "a", "b", ChartKind::Scatter).unwrap();
        assert_eq!(
            serde_json::to_value(&scatter).unwrap(),
            json!({"x": [1, 2], "y": ["cat", "dog"], "type": "scatter", "mode": "markers", "name": "a vs b"})
        );

        let bar = build_trace(&pets(), "a", "b", ChartKind::Bar).unwrap();
        let value = serde_json::to_value(&bar).unwrap();
        assert_eq!(value["type"], json!("bar"));
        assert!(value.get("mode").is_none());
    }
}
