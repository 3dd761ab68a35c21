use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::path::Path;

/// Contents of `config.json`: the endpoint to fetch and an opaque bearer
/// token, passed through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub url: String,
    pub token: String,
}

/// Runtime configuration: the config document joined with CLI settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub url: String,
    pub token: String,
    pub output_path: String,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P, output_path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("Error loading configuration: {}", e),
        })?;
        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|e| EtlError::ConfigError {
                message: format!("Error loading configuration: {}", e),
            })?;

        let config = Self {
            url: file.url,
            token: file.token,
            output_path: output_path.to_string(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url)?;
        validation::validate_non_empty_string("token", &self.token)?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn api_endpoint(&self) -> &str {
        &self.url
    }

    fn bearer_token(&self) -> &str {
        &self.token
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}
