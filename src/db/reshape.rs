//! Second relational pass: read `transactions` back, split the city column
//! into city and country, and reload everything into `new_transactions` as a
//! single batch.

use crate::db::loader::TransactionDb;
use crate::utils::error::Result;
use rusqlite::params;

/// Literal separator between city and country in the source data.
pub const CITY_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq)]
pub struct SplitTransactionRow {
    pub city: String,
    pub country: Option<String>,
    pub date: String,
    pub card_type: String,
    pub exp_type: String,
    pub gender: String,
    pub amount: i64,
}

/// Split at the first separator. A value without the separator keeps the whole
/// text as the city and yields no country; any further separators stay in the
/// country part.
pub fn split_city(city: &str) -> (String, Option<String>) {
    match city.split_once(CITY_SEPARATOR) {
        Some((city, country)) => (city.to_string(), Some(country.to_string())),
        None => (city.to_string(), None),
    }
}

pub fn ensure_new_transactions(db: &TransactionDb) -> Result<()> {
    db.connection().execute(
        "CREATE TABLE IF NOT EXISTS new_transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city TEXT,
            country TEXT,
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

/// Read everything out of `transactions` in insertion order, splitting the
/// city field on the way.
pub fn read_split_rows(db: &TransactionDb) -> Result<Vec<SplitTransactionRow>> {
    let mut stmt = db.connection().prepare(
        "SELECT city, date, card_type, exp_type, gender, amount
         FROM transactions ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let raw_city: String = row.get(0)?;
            let (city, country) = split_city(&raw_city);
            Ok(SplitTransactionRow {
                city,
                country,
                date: row.get(1)?,
                card_type: row.get(2)?,
                exp_type: row.get(3)?,
                gender: row.get(4)?,
                amount: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// The full reshape step: read, split, ensure, truncate, and insert all rows
/// in one transaction (no chunking).
pub fn reshape_transactions(db: &mut TransactionDb) -> Result<usize> {
    let rows = read_split_rows(db)?;

    ensure_new_transactions(db)?;
    db.truncate("new_transactions")?;
    println!("Table 'new_transactions' has been cleared.");

    let tx = db.connection_mut().transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO new_transactions
                 (city, country, date, card_type, exp_type, gender, amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for row in &rows {
            stmt.execute(params![
                row.city,
                row.country,
                row.date,
                row.card_type,
                row.exp_type,
                row.gender,
                row.amount
            ])?;
        }
    }
    tx.commit()?;
    println!("Data successfully inserted into 'new_transactions'.");

    Ok(rows.len())
}
