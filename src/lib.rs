pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, AppConfig, CliConfig};
pub use crate::core::{etl::EtlEngine, pipeline::FetchPipeline};
pub use crate::db::TransactionDb;
pub use crate::utils::error::{EtlError, Result};
