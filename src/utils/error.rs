use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Source {url} answered with HTTP {status}")]
    FetchError { url: String, status: u16 },

    #[error("Unrecognised sheet layout: {message}")]
    SchemaError { message: String },

    #[error("Invalid filter value: {message}")]
    QueryError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ApiError(_) | AppError::FetchError { .. } => ErrorCategory::Network,
            AppError::CsvError(_)
            | AppError::SerializationError(_)
            | AppError::SchemaError { .. }
            | AppError::QueryError { .. } => ErrorCategory::Data,
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AppError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the next periodic refresh may well succeed
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ApiError(_) | AppError::FetchError { .. } => {
                "Could not download the alumni sheet".to_string()
            }
            AppError::CsvError(_) => "The alumni sheet is not valid CSV".to_string(),
            AppError::SchemaError { .. } => {
                "The alumni sheet columns are not in a known layout".to_string()
            }
            AppError::QueryError { message } => format!("Invalid filter: {}", message),
            AppError::IoError(e) => format!("File access failed: {}", e),
            AppError::SerializationError(_) => "Could not write map export".to_string(),
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::ApiError(_) | AppError::FetchError { .. } => {
                "Check the network connection and that the sheet is published as CSV"
            }
            AppError::CsvError(_) => "Re-publish the sheet with output=csv",
            AppError::SchemaError { .. } => {
                "Set source.schema explicitly or rename the sheet columns"
            }
            AppError::QueryError { .. } => "Use 'all' or a four digit year",
            AppError::IoError(_) => "Check that the path exists and is readable",
            AppError::SerializationError(_) => "Check the export path",
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => "Fix the value in alumni-map.toml or on the command line",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
