use crate::domain::model::Entity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: u32 },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse grouping used when deciding how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidState,
    IoFailure,
    ParseFailure,
    Config,
}

impl LibraryError {
    pub fn not_found(entity: Entity, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidState { .. } => ErrorCategory::InvalidState,
            Self::IoError(_) => ErrorCategory::IoFailure,
            // csv wraps both io and deserialize failures
            Self::CsvError(e) if e.is_io_error() => ErrorCategory::IoFailure,
            Self::CsvError(_) | Self::ParseError { .. } => ErrorCategory::ParseFailure,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
        }
    }

    /// Text shown on the console for this error.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} not found.", entity),
            Self::InvalidState { message } => format!("{}.", message),
            Self::IoError(e) => format!("Could not access the data files: {}", e),
            Self::CsvError(e) => format!("Could not read or write the data files: {}", e),
            Self::ParseError { message } => format!("Data file is malformed: {}", message),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::NotFound => "Check the id and try again",
            ErrorCategory::InvalidState => "Check whether the book is currently issued",
            ErrorCategory::IoFailure => {
                "Check that the data directory exists and is writable; changes are kept in memory only"
            }
            ErrorCategory::ParseFailure => {
                "Fix or move the malformed data file; changes are kept in memory only"
            }
            ErrorCategory::Config => "Review the command line flags and configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
