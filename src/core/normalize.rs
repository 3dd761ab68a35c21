//! The tabular normalizer: turns a parsed JSON payload into a primary flat
//! table, then unpacks every column whose cells hold nested lists or records
//! into its own secondary table.
//!
//! Everything here is pure; failures are returned, callers decide what to log.

use crate::domain::model::Table;
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};

/// Column name used when an exploded list element is a bare scalar.
pub const SCALAR_COLUMN: &str = "value";

/// Build the primary table.
///
/// A list payload contributes one row per element, and every element must
/// itself be a record. An object payload is flattened into a single row with
/// dotted-path columns for nested records; nested lists stay whole in one
/// column so complex-column unpacking can pick them up. Anything else is
/// rejected as an unsupported format.
pub fn normalize(data: &Value) -> Result<Table> {
    match data {
        Value::Array(items) => {
            let mut table = Table::new();
            for item in items {
                match item {
                    Value::Object(obj) => {
                        table.push_record(obj.iter().map(|(k, v)| (k.clone(), v.clone())));
                    }
                    other => {
                        return Err(EtlError::FormatError {
                            message: format!(
                                "expected an object element, found {}",
                                type_name(other)
                            ),
                        })
                    }
                }
            }
            Ok(table)
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.push_record(flatten_record(obj));
            Ok(table)
        }
        other => Err(EtlError::FormatError {
            message: format!("expected a list or object payload, found {}", type_name(other)),
        }),
    }
}

/// Key-path expansion of one record: nested records become dotted-path fields
/// (`address.city`); lists and scalars are kept as-is.
pub fn flatten_record(record: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    for (key, value) in record {
        flatten_into(key.clone(), value, &mut fields);
    }
    fields
}

fn flatten_into(path: String, value: &Value, fields: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(obj) => {
            for (key, nested) in obj {
                flatten_into(format!("{}.{}", path, key), nested, fields);
            }
        }
        other => fields.push((path, other.clone())),
    }
}

/// Columns holding at least one nested list or record in any row. All-scalar
/// columns, including all-null ones, are never complex.
pub fn complex_columns(table: &Table) -> Vec<String> {
    let mut found = Vec::new();
    for (idx, name) in table.columns().iter().enumerate() {
        let complex = table
            .rows()
            .iter()
            .any(|row| matches!(&row[idx], Value::Array(_) | Value::Object(_)));
        if complex {
            found.push(name.clone());
        }
    }
    found
}

/// Unpack one complex column into its own table.
///
/// The column is list-shaped iff every non-null cell is a list; an empty
/// non-null set also takes the list branch (inherited classification, see
/// DESIGN.md). List-shaped columns are exploded row-wise, everything else is
/// treated as a column of records.
pub fn unpack_column(table: &Table, column: &str) -> Result<Table> {
    let cells = table
        .column_values(column)
        .ok_or_else(|| EtlError::ColumnUnpackError {
            column: column.to_string(),
            message: "no such column".to_string(),
        })?;

    let non_null: Vec<&Value> = cells.iter().copied().filter(|v| !v.is_null()).collect();

    if non_null.iter().all(|v| v.is_array()) {
        unpack_list_shaped(column, &cells)
    } else {
        unpack_record_shaped(column, &non_null)
    }
}

/// Explode semantics: a row whose list has k elements becomes k rows; an empty
/// list or a null cell becomes one row with a null element. Each element is
/// then flattened — records via dotted paths, scalars into the single default
/// column.
fn unpack_list_shaped(column: &str, cells: &[&Value]) -> Result<Table> {
    let mut table = Table::new();
    for cell in cells {
        match cell {
            Value::Array(items) if !items.is_empty() => {
                for item in items {
                    push_element(&mut table, column, item)?;
                }
            }
            _ => push_element(&mut table, column, &Value::Null)?,
        }
    }
    Ok(table)
}

fn push_element(table: &mut Table, column: &str, element: &Value) -> Result<()> {
    match element {
        Value::Object(obj) => table.push_record(flatten_record(obj)),
        Value::Array(_) => {
            return Err(EtlError::ColumnUnpackError {
                column: column.to_string(),
                message: "nested lists inside list elements are not supported".to_string(),
            })
        }
        Value::Null => table.push_record(std::iter::empty()),
        scalar => table.push_record([(SCALAR_COLUMN.to_string(), scalar.clone())]),
    }
    Ok(())
}

/// Record-shaped unpacking: one secondary row per non-null source cell, in
/// original order, no row explosion. Any non-record cell fails the whole
/// column.
fn unpack_record_shaped(column: &str, non_null: &[&Value]) -> Result<Table> {
    let mut table = Table::new();
    for cell in non_null {
        match cell {
            Value::Object(obj) => table.push_record(flatten_record(obj)),
            other => {
                return Err(EtlError::ColumnUnpackError {
                    column: column.to_string(),
                    message: format!("expected a record cell, found {}", type_name(other)),
                })
            }
        }
    }
    Ok(table)
}

/// Unpack every complex column, isolating failures: a column that cannot be
/// unpacked is reported back and skipped, the remaining columns still produce
/// their tables.
pub fn unpack_all(table: &Table) -> (Vec<(String, Table)>, Vec<(String, EtlError)>) {
    let mut unpacked = Vec::new();
    let mut failures = Vec::new();
    for column in complex_columns(table) {
        match unpack_column(table, &column) {
            Ok(nested) => unpacked.push((column, nested)),
            Err(e) => failures.push((column, e)),
        }
    }
    (unpacked, failures)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
