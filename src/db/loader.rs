//! Relational load step: reads the primary CSV back and batch-inserts it into
//! the `transactions` table. The table is created once and truncated, never
//! dropped, so its schema survives across runs while the rows do not.

use crate::utils::error::{EtlError, Result};
use rusqlite::{params, Connection};
use std::path::Path;

/// Rows inserted per committed batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One row bound for insertion into `transactions`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub city: String,
    pub date: String,
    pub card_type: String,
    pub exp_type: String,
    pub gender: String,
    pub amount: i64,
}

/// Connection wrapper shared by the two relational steps.
pub struct TransactionDb {
    conn: Connection,
}

impl TransactionDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn ensure_transactions(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city TEXT,
                date TEXT,
                card_type TEXT,
                exp_type TEXT,
                gender CHAR(1),
                amount INTEGER
            )",
            [],
        )?;
        Ok(())
    }

    /// SQLite has no TRUNCATE; a predicate-free DELETE clears the rows and
    /// keeps the schema.
    pub fn truncate(&self, table: &str) -> Result<()> {
        self.conn.execute(&format!("DELETE FROM {}", table), [])?;
        Ok(())
    }

    pub fn count(&self, table: &str) -> Result<i64> {
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Insert rows in committed batches. Each batch commits on its own; a
    /// failure mid-run leaves the earlier batches in place.
    pub fn insert_batches(&mut self, rows: &[TransactionRow], batch_size: usize) -> Result<usize> {
        let mut inserted = 0;
        for batch in rows.chunks(batch_size.max(1)) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare_cached(
                    "INSERT INTO transactions (city, date, card_type, exp_type, gender, amount)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for row in batch {
                    stmt.execute(params![
                        row.city,
                        row.date,
                        row.card_type,
                        row.exp_type,
                        row.gender,
                        row.amount
                    ])?;
                }
            }
            tx.commit()?;
            inserted += batch.len();
            tracing::info!("Inserted {} rows...", batch.len());
        }
        Ok(inserted)
    }
}

/// Read the primary CSV and bind its columns onto the fixed insert list.
///
/// Headers are matched after trimming and ASCII-lowercasing, so `City` and
/// ` Card Type ` both resolve. `date` stays text; `amount` must be an integer
/// (integer-valued floats are accepted).
pub fn read_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<TransactionRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let city = find_column(&headers, &["city"])?;
    let date = find_column(&headers, &["date"])?;
    let card_type = find_column(&headers, &["card type", "card_type"])?;
    let exp_type = find_column(&headers, &["exp type", "exp_type"])?;
    let gender = find_column(&headers, &["gender"])?;
    let amount = find_column(&headers, &["amount"])?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(TransactionRow {
            city: field(city),
            date: field(date),
            card_type: field(card_type),
            exp_type: field(exp_type),
            gender: field(gender),
            amount: parse_amount(record.get(amount).unwrap_or(""))?,
        });
    }
    Ok(rows)
}

fn find_column(headers: &[String], names: &[&str]) -> Result<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.as_str()))
        .ok_or_else(|| EtlError::ProcessingError {
            message: format!("missing required column '{}' in dataset", names[0]),
        })
}

fn parse_amount(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 => Ok(value as i64),
        _ => Err(EtlError::ProcessingError {
            message: format!("amount '{}' is not an integer", raw),
        }),
    }
}

/// The full loader step: ensure the table exists, clear it, and batch-insert
/// the CSV contents.
pub fn load_transactions<P: AsRef<Path>>(
    db: &mut TransactionDb,
    path: P,
    batch_size: usize,
) -> Result<usize> {
    db.ensure_transactions()?;
    db.truncate("transactions")?;
    println!("Table 'transactions' has been cleared.");

    let rows = read_transactions(path)?;
    let inserted = db.insert_batches(&rows, batch_size)?;
    println!("All data inserted successfully.");
    Ok(inserted)
}
