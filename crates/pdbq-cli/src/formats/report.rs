//! Custom report CSV parsing
//!
//! The header line names the columns. Cell types are inferred per column, the
//! way a dataframe reader would: all-integer columns become integers, then
//! all-numeric columns become floats, everything else stays text. Empty cells
//! do not take part in inference. Only plain decimal notation counts as
//! numeric, so identifiers like `1E10` stay text.

use crate::error::{CliError, Result};
use csv::{ReaderBuilder, Trim};
use pdbq_common::types::{ColumnType, FieldReport, FieldValue};
use tracing::warn;

/// Parse a CSV report body into a [`FieldReport`]
pub fn parse_report_csv(body: &str) -> Result<FieldReport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(String::is_empty) {
        return Err(CliError::malformed("report has no header line"));
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() > columns.len() {
            warn!(
                row = index,
                cells = record.len(),
                columns = columns.len(),
                "Report row is wider than the header, dropping extra cells"
            );
        }
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(columns.len(), String::new());
        raw_rows.push(cells);
    }

    let column_types: Vec<ColumnType> = (0..columns.len())
        .map(|i| infer_column_type(raw_rows.iter().map(|row| row[i].as_str())))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|cells| {
            cells
                .into_iter()
                .zip(&column_types)
                .map(|(cell, ty)| to_value(cell, *ty))
                .collect()
        })
        .collect();

    Ok(FieldReport {
        columns,
        column_types,
        rows,
    })
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut ty = ColumnType::Integer;
    let mut seen = false;

    for cell in cells.filter(|c| !c.is_empty()) {
        seen = true;
        if ty == ColumnType::Integer && cell.parse::<i64>().is_err() {
            ty = ColumnType::Float;
        }
        if ty == ColumnType::Float && !is_float(cell) {
            return ColumnType::Text;
        }
    }

    if seen {
        ty
    } else {
        ColumnType::Text
    }
}

// Rejects exponents ("1E10" is a structure id) as well as "inf"/"nan"
fn is_float(cell: &str) -> bool {
    let decimal = cell
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'));
    decimal && cell.parse::<f64>().is_ok()
}

fn to_value(cell: String, ty: ColumnType) -> FieldValue {
    if cell.is_empty() {
        return FieldValue::Empty;
    }
    match ty {
        ColumnType::Integer => cell
            .parse()
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Text(cell)),
        ColumnType::Float => cell
            .parse()
            .map(FieldValue::Float)
            .unwrap_or(FieldValue::Text(cell)),
        ColumnType::Text => FieldValue::Text(cell),
    }
}
