pub mod app_config;
pub mod cli;

pub use app_config::AppConfig;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bank-etl")]
#[command(about = "Fetches a JSON payload, flattens it to CSV files, and loads it into SQLite")]
pub struct CliConfig {
    #[arg(long, default_value = "config.json")]
    pub config: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = "bank.db")]
    pub database: String,

    #[arg(long, default_value = "1000")]
    pub batch_size: usize,

    #[arg(long, help = "Skip the relational load steps")]
    pub skip_db: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
