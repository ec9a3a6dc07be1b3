use crate::domain::validation::Violation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayStreamError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{}", Violation::join(.0))]
    InvalidRequest(Vec<Violation>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("You don't have the required permissions to access this resource")]
    Forbidden,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

impl PayStreamError {
    /// HTTP status code the API surface answers with for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::ValidationError(_) | Self::InvalidRequest(_) => 400,
            Self::BadRequest(_) | Self::Unauthenticated(_) => 400,
            Self::JsonError(_) | Self::CsvError(_) => 400,
            Self::Forbidden => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Short human-readable title used in problem responses.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ValidationError(_) | Self::InvalidRequest(_) => "Validation Error",
            Self::Unauthenticated(_) => "Authentication Error",
            Self::Forbidden => "Access Denied",
            Self::NotFound(_) => "Not Found",
            Self::Conflict(_) => "Conflict",
            Self::BadRequest(_) | Self::JsonError(_) | Self::CsvError(_) => "Bad Request",
            _ => "Internal Server Error",
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(Box::new(std::io::Error::other(message.into())))
    }
}

pub type Result<T> = std::result::Result<T, PayStreamError>;
