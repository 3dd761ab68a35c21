use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DbError(#[from] rusqlite::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Unsupported data format: {message}")]
    FormatError { message: String },

    #[error("Error processing column '{column}': {message}")]
    ColumnUnpackError { column: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

impl EtlError {
    /// Short console message for terminal failures. The detailed cause goes to
    /// the error log; the operator sees one line.
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ConfigError { .. } => "Error loading 'config.json'.".to_string(),
            EtlError::ApiError(_) => "Error retrieving data.".to_string(),
            EtlError::SerializationError(_) => "Error parsing JSON response.".to_string(),
            EtlError::FormatError { .. } => "Unsupported data format.".to_string(),
            EtlError::ColumnUnpackError { column, .. } => {
                format!(
                    "Error processing column: '{}'. See 'parser_errors.log'.",
                    column
                )
            }
            EtlError::CsvError(_) => "Error saving CSV file.".to_string(),
            EtlError::DbError(_) => "Database connection error.".to_string(),
            EtlError::IoError(_) => "File error. See 'parser_errors.log'.".to_string(),
            EtlError::ProcessingError { .. } => {
                "Error processing data. See 'parser_errors.log'.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
