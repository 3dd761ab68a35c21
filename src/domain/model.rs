use serde_json::Value;

/// An in-memory flat table: an ordered list of column names plus dense rows.
///
/// All rows share the same column set. Fields absent from a contributing record
/// are stored as an explicit `Value::Null` rather than left out, so every row
/// has exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All cells of one column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Append one row from (column, value) pairs. A key not seen before adds a
    /// new column at the end; earlier rows are backfilled with null.
    pub fn push_record<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut row = vec![Value::Null; self.columns.len()];
        for (key, value) in fields {
            match self.column_index(&key) {
                Some(idx) => row[idx] = value,
                None => {
                    self.columns.push(key);
                    for earlier in &mut self.rows {
                        earlier.push(Value::Null);
                    }
                    row.push(value);
                }
            }
        }
        self.rows.push(row);
    }
}

/// Output of the transform stage: the primary table plus one secondary table
/// per unpacked complex column, in detection order.
#[derive(Debug, Clone)]
pub struct NormalizeResult {
    pub primary: Table,
    pub nested: Vec<(String, Table)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_record_keeps_column_order() {
        let mut table = Table::new();
        table.push_record([
            ("b".to_string(), json!(1)),
            ("a".to_string(), json!(2)),
        ]);

        assert_eq!(table.columns(), ["b", "a"]);
        assert_eq!(table.get(0, "b"), Some(&json!(1)));
        assert_eq!(table.get(0, "a"), Some(&json!(2)));
    }

    #[test]
    fn test_push_record_backfills_new_columns_with_null() {
        let mut table = Table::new();
        table.push_record([("a".to_string(), json!(1))]);
        table.push_record([
            ("a".to_string(), json!(2)),
            ("b".to_string(), json!("x")),
        ]);

        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.get(0, "b"), Some(&Value::Null));
        assert_eq!(table.get(1, "b"), Some(&json!("x")));
    }

    #[test]
    fn test_push_record_fills_missing_fields_with_null() {
        let mut table = Table::new();
        table.push_record([
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
        ]);
        table.push_record([("a".to_string(), json!(3))]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, "b"), Some(&Value::Null));
    }

    #[test]
    fn test_column_values() {
        let mut table = Table::new();
        table.push_record([("x".to_string(), json!(1))]);
        table.push_record([("x".to_string(), json!(2))]);

        let values = table.column_values("x").unwrap();
        assert_eq!(values, [&json!(1), &json!(2)]);
        assert!(table.column_values("missing").is_none());
    }
}
