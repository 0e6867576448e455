// CSV upload path: turn a CSV file into a record-oriented Dataset

use crate::data::{Dataset, Row};
use crate::error::PlotError;
use serde_json::{Number, Value};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Input path that stands for stdin
pub const STDIN_PATH: &str = "-";

/// Read a CSV document (header row required) into a Dataset
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, PlotError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), infer_cell(cell));
        }
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "parsed csv");
    Ok(Dataset::new(rows))
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<Dataset, PlotError> {
    read_csv(io::stdin().lock())
}

/// Load a dataset from disk.
///
/// `-` reads CSV from stdin. `.csv` files go through [`read_csv`]; `.json`
/// files must already hold an array of records. Anything else is rejected.
pub fn load_file(path: &Path) -> Result<Dataset, PlotError> {
    if path == Path::new(STDIN_PATH) {
        return read_csv_from_stdin();
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => read_csv(File::open(path)?),
        Some("json") => Dataset::from_json_reader(io::BufReader::new(File::open(path)?)),
        _ => Err(PlotError::UnsupportedFileType(path.display().to_string())),
    }
}

/// Infer the JSON scalar for a single CSV cell
pub fn infer_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::from(i);
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        // NaN and infinities have no JSON form
        return Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    Value::String(raw.to_string())
}
