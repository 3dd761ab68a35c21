use crate::core::normalize;
use crate::core::writer;
use crate::core::{ConfigProvider, NormalizeResult, Pipeline, Storage};
use crate::utils::error::Result;
use crate::utils::logger::ErrorLog;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

/// Primary output filename; each unpacked column goes to `<column>_table.csv`.
pub const DATASET_FILE: &str = "dataset.csv";

pub struct FetchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    error_log: Arc<ErrorLog>,
}

impl<S: Storage, C: ConfigProvider> FetchPipeline<S, C> {
    pub fn new(storage: S, config: C, error_log: Arc<ErrorLog>) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
            error_log,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FetchPipeline<S, C> {
    async fn extract(&self) -> Result<Value> {
        tracing::debug!("Making API request to: {}", self.config.api_endpoint());

        let response = self
            .client
            .get(self.config.api_endpoint())
            .bearer_auth(self.config.bearer_token())
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());
        let response = response.error_for_status()?;

        // Parse from the raw body so a malformed payload surfaces as a parse
        // error, distinct from a transport failure.
        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;
        Ok(data)
    }

    async fn transform(&self, data: Value) -> Result<NormalizeResult> {
        let primary = normalize::normalize(&data)?;
        tracing::info!(
            "Normalized payload into {} rows, {} columns",
            primary.row_count(),
            primary.columns().len()
        );

        let complex = normalize::complex_columns(&primary);
        if complex.is_empty() {
            tracing::info!("No complex columns found. No unpacking needed.");
        } else {
            tracing::info!("Found complex columns: {:?}", complex);
        }

        let (nested, failures) = normalize::unpack_all(&primary);
        for (column, error) in failures {
            self.error_log
                .error(&format!("Error processing column '{}': {}", column, error));
            println!(
                "Error processing column: '{}'. See 'parser_errors.log'.",
                column
            );
        }

        Ok(NormalizeResult { primary, nested })
    }

    async fn load(&self, result: NormalizeResult) -> Result<String> {
        // Writes never abort the run. A failed primary write is reported to
        // the user and the secondary tables still go out; the database step
        // downstream surfaces the missing file on its own.
        let primary_outcome = match writer::table_to_csv(&result.primary) {
            Ok(data) => self.storage.write_file(DATASET_FILE, &data).await,
            Err(e) => Err(e),
        };
        match primary_outcome {
            Ok(()) => println!("Data saved as '{}'.", DATASET_FILE),
            Err(e) => {
                self.error_log
                    .error(&format!("Error saving CSV file '{}': {}", DATASET_FILE, e));
                println!("Error saving CSV file.");
            }
        }

        for (column, nested) in &result.nested {
            let filename = format!("{}_table.csv", column);
            let outcome = match writer::table_to_csv(nested) {
                Ok(data) => self.storage.write_file(&filename, &data).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => {
                    println!("Column '{}' unpacked and saved as '{}'.", column, filename);
                }
                Err(e) => {
                    self.error_log
                        .error(&format!("Error saving CSV file '{}': {}", filename, e));
                }
            }
        }

        Ok(format!("{}/{}", self.config.output_path(), DATASET_FILE))
    }
}
