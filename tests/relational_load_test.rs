use anyhow::Result;
use bank_etl::db::loader::{self, DEFAULT_BATCH_SIZE};
use bank_etl::db::reshape;
use bank_etl::TransactionDb;
use tempfile::TempDir;

fn write_dataset(dir: &TempDir, rows: &[&str]) -> Result<String> {
    let path = dir.path().join("dataset.csv");
    let mut content = String::from("City,Date,Card Type,Exp Type,Gender,Amount\n");
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content)?;
    Ok(path.to_str().unwrap().to_string())
}

#[test]
fn test_load_then_reshape_into_new_transactions() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dataset = write_dataset(
        &temp_dir,
        &[
            "\"Seattle, USA\",2024-01-15,Gold,Bills,F,120",
            "Singapore,2024-01-16,Silver,Fuel,M,85",
        ],
    )?;

    let mut db = TransactionDb::open(temp_dir.path().join("bank.db"))?;

    let inserted = loader::load_transactions(&mut db, &dataset, DEFAULT_BATCH_SIZE)?;
    assert_eq!(inserted, 2);
    assert_eq!(db.count("transactions")?, 2);

    let reshaped = reshape::reshape_transactions(&mut db)?;
    assert_eq!(reshaped, 2);

    let rows: Vec<(String, Option<String>, String, i64)> = db
        .connection()
        .prepare("SELECT city, country, card_type, amount FROM new_transactions ORDER BY id")?
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<std::result::Result<_, _>>()?;

    assert_eq!(
        rows,
        vec![
            ("Seattle".to_string(), Some("USA".to_string()), "Gold".to_string(), 120),
            ("Singapore".to_string(), None, "Silver".to_string(), 85),
        ]
    );

    Ok(())
}

#[test]
fn test_second_run_replaces_first_runs_rows() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut db = TransactionDb::open(temp_dir.path().join("bank.db"))?;

    let first = write_dataset(
        &temp_dir,
        &[
            "\"Seattle, USA\",2024-01-15,Gold,Bills,F,120",
            "\"Delhi, India\",2024-01-16,Silver,Fuel,M,85",
        ],
    )?;
    loader::load_transactions(&mut db, &first, DEFAULT_BATCH_SIZE)?;
    reshape::reshape_transactions(&mut db)?;
    assert_eq!(db.count("transactions")?, 2);
    assert_eq!(db.count("new_transactions")?, 2);

    let second = write_dataset(&temp_dir, &["\"Lisbon, Portugal\",2024-02-01,Gold,Travel,F,300"])?;
    loader::load_transactions(&mut db, &second, DEFAULT_BATCH_SIZE)?;
    reshape::reshape_transactions(&mut db)?;

    // Truncate-then-insert: never a union of both runs.
    assert_eq!(db.count("transactions")?, 1);
    assert_eq!(db.count("new_transactions")?, 1);

    let country: Option<String> = db
        .connection()
        .query_row("SELECT country FROM new_transactions", [], |row| row.get(0))?;
    assert_eq!(country, Some("Portugal".to_string()));

    Ok(())
}

#[test]
fn test_load_survives_more_rows_than_one_batch() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let rows: Vec<String> = (0..2500)
        .map(|i| format!("\"City{}, Land\",2024-01-15,Gold,Bills,F,{}", i, i))
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
    let dataset = write_dataset(&temp_dir, &row_refs)?;

    let mut db = TransactionDb::open(temp_dir.path().join("bank.db"))?;
    let inserted = loader::load_transactions(&mut db, &dataset, DEFAULT_BATCH_SIZE)?;

    assert_eq!(inserted, 2500);
    assert_eq!(db.count("transactions")?, 2500);

    Ok(())
}
