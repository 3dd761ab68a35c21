//! CSV serialization of tables: header row from the column order, UTF-8,
//! no index column. Reading back yields text cells only; re-typing is the
//! relational loader's job.

use crate::domain::model::Table;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

pub fn table_to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| EtlError::ProcessingError {
            message: format!("failed to finish CSV output: {}", e),
        })
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Lists/records kept whole in the primary table serialize as compact JSON.
        nested => nested.to_string(),
    }
}

pub fn read_table(data: &[u8]) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(data);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut table = Table::with_columns(headers.clone());
    for record in reader.records() {
        let record = record?;
        table.push_record(
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(|cell| Value::String(cell.to_string()))),
        );
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> Table {
        let mut table = Table::new();
        table.push_record([
            ("city".to_string(), json!("Seattle, USA")),
            ("amount".to_string(), json!(120)),
            ("note".to_string(), Value::Null),
        ]);
        table.push_record([
            ("city".to_string(), json!("Delhi, India")),
            ("amount".to_string(), json!(85)),
            ("note".to_string(), json!("weekend")),
        ]);
        table
    }

    #[test]
    fn test_write_preserves_column_order_and_quotes() {
        let data = table_to_csv(&sample_table()).unwrap();
        let text = String::from_utf8(data).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "city,amount,note");
        // The embedded comma forces quoting.
        assert_eq!(lines[1], "\"Seattle, USA\",120,");
        assert_eq!(lines[2], "\"Delhi, India\",85,weekend");
    }

    #[test]
    fn test_round_trip_keeps_rows_and_values() {
        let table = sample_table();
        let data = table_to_csv(&table).unwrap();
        let back = read_table(&data).unwrap();

        assert_eq!(back.row_count(), table.row_count());
        assert_eq!(back.columns(), table.columns());
        assert_eq!(back.get(0, "city"), Some(&json!("Seattle, USA")));
        // Numbers come back as text; nulls come back as empty strings.
        assert_eq!(back.get(0, "amount"), Some(&json!("120")));
        assert_eq!(back.get(0, "note"), Some(&json!("")));
    }

    #[test]
    fn test_nested_cells_render_as_json() {
        let mut table = Table::new();
        table.push_record([("tags".to_string(), json!(["a", "b"]))]);

        let data = table_to_csv(&table).unwrap();
        let text = String::from_utf8(data).unwrap();

        assert!(text.lines().nth(1).unwrap().contains("[\"\"a\"\",\"\"b\"\"]"));
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let table = Table::with_columns(vec!["a".to_string(), "b".to_string()]);
        let data = table_to_csv(&table).unwrap();
        let text = String::from_utf8(data.clone()).unwrap();

        assert_eq!(text.trim_end(), "a,b");

        let back = read_table(&data).unwrap();
        assert!(back.is_empty());
        assert_eq!(back.columns(), ["a", "b"]);
    }
}
