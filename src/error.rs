use thiserror::Error;

/// Status code the quote provider uses when identification data is missing.
pub const IDENT_INCOMPLETE_STATUS: u16 = 400;
/// Message paired with [`IDENT_INCOMPLETE_STATUS`] for the KYC signal.
pub const IDENT_INCOMPLETE_MESSAGE: &str = "Ident data incomplete";

#[derive(Error, Debug)]
pub enum SellError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Wallet error: {0}")]
    WalletError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
}

impl SellError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// True when the provider rejected the quote because the user's
    /// identification data is incomplete.
    pub fn is_ident_incomplete(&self) -> bool {
        matches!(
            self,
            Self::ApiError { status, message }
                if *status == IDENT_INCOMPLETE_STATUS && message == IDENT_INCOMPLETE_MESSAGE
        )
    }
}

pub type Result<T> = std::result::Result<T, SellError>;
