//! Ledger Errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Error during ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Insufficient balance: have {available}, need {requested}")]
    InsufficientBalance { available: Decimal, requested: Decimal },

    #[error("Insufficient stake: have {available}, need {requested}")]
    InsufficientStake { available: Decimal, requested: Decimal },

    #[error("No pending rewards to claim")]
    NothingToClaim,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Content address must not be empty")]
    EmptyContentAddress,

    #[error("Unknown transaction kind: {0}")]
    UnknownKind(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
