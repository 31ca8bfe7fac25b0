use alloy_primitives::{Address, TxHash};
use thiserror::Error;

/// Top-level error type for the cashout core
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No prior cheque received for vault {0}")]
    NoPriorCheque(Address),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Expected exactly one {event} event from {vault}, found {found}")]
    EventDecodeAmbiguous {
        event: &'static str,
        vault: Address,
        found: usize,
    },

    #[error("ABI decode error: {0}")]
    AbiDecode(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// True when a receipt carried none of the requested event
    pub fn is_event_not_found(&self) -> bool {
        matches!(self, AppError::EventDecodeAmbiguous { found: 0, .. })
    }
}

/// Ledger and transport errors, surfaced by the ledger collaborators
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TxHash),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

/// Record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(error: config::ConfigError) -> Self {
        AppError::Config(format!("{:?}", error))
    }
}

/// Result type alias for the crate
pub type AppResult<T> = Result<T, AppError>;
