use bank_etl::db::{loader, reshape};
use bank_etl::utils::logger::{self, ErrorLog};
use bank_etl::{AppConfig, CliConfig, EtlEngine, FetchPipeline, LocalStorage, TransactionDb};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting bank-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let error_log = match ErrorLog::open("parser_errors.log") {
        Ok(log) => Arc::new(log),
        Err(e) => {
            eprintln!("Error opening 'parser_errors.log': {}", e);
            std::process::exit(1);
        }
    };

    let config = match AppConfig::load(&cli.config, &cli.output_path) {
        Ok(config) => config,
        Err(e) => {
            error_log.error(&format!("Error loading configuration: {}", e));
            println!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(cli.output_path.clone());
    let pipeline = FetchPipeline::new(storage, config, Arc::clone(&error_log));
    let engine = EtlEngine::new(pipeline);

    // Step 1: fetch, flatten, and write the CSV files.
    let dataset_path = match engine.run().await {
        Ok(path) => path,
        Err(e) => {
            error_log.error(&e.to_string());
            println!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if cli.skip_db {
        tracing::info!("Skipping relational load (--skip-db)");
        return;
    }

    // Step 2: load the primary CSV into `transactions` in bounded batches.
    let mut db = match TransactionDb::open(&cli.database) {
        Ok(db) => {
            println!("Successfully connected to the database!");
            db
        }
        Err(e) => {
            error_log.error(&format!("Database connection error: {}", e));
            println!("Database connection error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = loader::load_transactions(&mut db, &dataset_path, cli.batch_size) {
        error_log.error(&format!("Error loading transactions: {}", e));
        println!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    // Step 3: split city/country and reload into `new_transactions`.
    if let Err(e) = reshape::reshape_transactions(&mut db) {
        error_log.error(&format!("Error reshaping transactions: {}", e));
        println!("{}", e.user_friendly_message());
        std::process::exit(1);
    }
}
