//! CSV table reading.
//!
//! Rows are returned as ordered JSON objects so they can be passed through to
//! the response unchanged. Each field is typed on read: empty cells and `NaN`
//! become `null`, numeric literals become numbers and everything else stays a
//! string.

use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::error::{CamelsError, Result};

/// One table row, keyed by column name in file order.
pub type Row = Map<String, Value>;

/// Read every row of a CSV file.
///
/// An absent file yields an empty table.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    read_filtered(path, None)
}

/// Read the rows of a CSV file whose `column` equals `station_id`.
///
/// An absent file yields an empty table, same as a file without matching rows.
///
/// # Errors
///
/// Returns [`CamelsError::MissingColumn`] if the file exists but has no
/// `column` header, and [`CamelsError::Csv`] for malformed input.
pub fn read_rows_matching(path: &Path, column: &str, station_id: &str) -> Result<Vec<Row>> {
    read_filtered(path, Some((column, station_id)))
}

fn read_filtered(path: &Path, filter: Option<(&str, &str)>) -> Result<Vec<Row>> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "Table not found, treating as empty");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let filter = match filter {
        Some((column, station_id)) => {
            let idx = headers.iter().position(|h| h == column).ok_or_else(|| {
                CamelsError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                }
            })?;
            Some((idx, station_id))
        }
        None => None,
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;

        if let Some((idx, station_id)) = filter {
            if record.get(idx).map(str::trim) != Some(station_id) {
                continue;
            }
        }

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, raw)| (name.to_string(), parse_field(raw)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Convert a raw CSV cell into a typed JSON value.
///
/// # Examples
///
/// ```
/// use camels::table::parse_field;
/// use serde_json::json;
///
/// assert_eq!(parse_field("42"), json!(42));
/// assert_eq!(parse_field("0.25"), json!(0.25));
/// assert_eq!(parse_field(""), json!(null));
/// assert_eq!(parse_field("Elbe"), json!("Elbe"));
/// ```
pub fn parse_field(raw: &str) -> Value {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Value::Null;
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }

    if let Ok(float) = trimmed.parse::<f64>() {
        // JSON has no representation for infinities
        return Number::from_f64(float).map_or(Value::Null, Value::Number);
    }

    Value::String(raw.to_string())
}
