use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Primary table '{table}' was not fetched; nothing to merge")]
    MissingPrimaryTable { table: String },

    #[error("Column '{column}' is missing from {table}")]
    MissingColumn { column: String, table: String },

    #[error("Missing credential: environment variable {variable} is not set")]
    MissingCredentials { variable: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Publish failed: {message}")]
    PublishError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Schema,
    Storage,
    Publish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingCredentials { .. }
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::MissingPrimaryTable { .. } | EtlError::MissingColumn { .. } => {
                ErrorCategory::Schema
            }
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            EtlError::PublishError { .. } => ErrorCategory::Publish,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Publish => ErrorSeverity::Medium,
            ErrorCategory::Schema => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 程序結束碼；所有致命錯誤皆非零
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MissingPrimaryTable { table } => format!(
                "Check that the source page for '{}' is reachable and still contains the table",
                table
            ),
            EtlError::MissingColumn { column, .. } => format!(
                "The source site may have renamed '{}'; update the light column list",
                column
            ),
            EtlError::MissingCredentials { variable } => format!(
                "Export {} before running, or pass --no-publish to skip the upload",
                variable
            ),
            EtlError::ApiError(_) => "Check network connectivity and retry later".to_string(),
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => {
                "Check the metadata settings in the configuration".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments".to_string()
            }
            EtlError::PublishError { .. } => {
                "Check that the kaggle CLI is installed and the credentials are valid".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Schema => format!("Source schema problem: {}", self),
            ErrorCategory::Storage => format!("Could not write output: {}", self),
            ErrorCategory::Publish => format!("Could not publish dataset: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
