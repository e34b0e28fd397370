//! Structured error types for the service layer
//!
//! Every failure a caller can see is one [`CarbonError`]. [`ErrorKind`] is
//! the payload-free discriminant for callers that only branch on the kind.

use lib_ledger::LedgerError;
use lib_market::PricingError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error kinds surfaced to UI / CLI callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotConnected,
    InvalidAmount,
    InvalidReserves,
    InsufficientBalance,
    NothingToClaim,
    StorageUnavailable,
    PriceSourceUnavailable,
    CollaboratorTimeout,
    SlippageExceeded,
    InvalidRequest,
    InvalidConfig,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarbonError {
    #[error("No wallet connected")]
    NotConnected,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid pool reserves: {0}")]
    InvalidReserves(String),

    #[error("Insufficient balance: have {available}, need {requested}")]
    InsufficientBalance { available: Decimal, requested: Decimal },

    #[error("No pending rewards to claim")]
    NothingToClaim,

    #[error("Content store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Price source unavailable: {0}")]
    PriceSourceUnavailable(String),

    #[error("{collaborator} did not respond within {timeout_ms}ms")]
    CollaboratorTimeout {
        collaborator: &'static str,
        timeout_ms: u64,
    },

    #[error("Slippage tolerance exceeded: output {output}, minimum acceptable {min_acceptable}")]
    SlippageExceeded {
        output: Decimal,
        min_acceptable: Decimal,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CarbonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CarbonError::NotConnected => ErrorKind::NotConnected,
            CarbonError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            CarbonError::InvalidReserves(_) => ErrorKind::InvalidReserves,
            CarbonError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            CarbonError::NothingToClaim => ErrorKind::NothingToClaim,
            CarbonError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            CarbonError::PriceSourceUnavailable(_) => ErrorKind::PriceSourceUnavailable,
            CarbonError::CollaboratorTimeout { .. } => ErrorKind::CollaboratorTimeout,
            CarbonError::SlippageExceeded { .. } => ErrorKind::SlippageExceeded,
            CarbonError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            CarbonError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }

    /// Collaborator failures leave no state behind and may be retried as-is
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StorageUnavailable
                | ErrorKind::PriceSourceUnavailable
                | ErrorKind::CollaboratorTimeout
        )
    }
}

impl From<LedgerError> for CarbonError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(amount) => {
                CarbonError::InvalidAmount(format!("{} is not a positive amount", amount))
            }
            LedgerError::InsufficientBalance {
                available,
                requested,
            }
            | LedgerError::InsufficientStake {
                available,
                requested,
            } => CarbonError::InsufficientBalance {
                available,
                requested,
            },
            LedgerError::NothingToClaim => CarbonError::NothingToClaim,
            LedgerError::Overflow => CarbonError::InvalidAmount("amount overflows".to_string()),
            LedgerError::EmptyContentAddress => {
                CarbonError::StorageUnavailable("store returned an empty content address".to_string())
            }
            LedgerError::UnknownKind(kind) => {
                CarbonError::InvalidRequest(format!("unknown transaction kind '{}'", kind))
            }
            LedgerError::Serialization(msg) => CarbonError::InvalidRequest(msg),
        }
    }
}

impl From<PricingError> for CarbonError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidAmount(_)
            | PricingError::ZeroOutputAmount
            | PricingError::InsufficientLiquidity
            | PricingError::Overflow => CarbonError::InvalidAmount(err.to_string()),
            PricingError::InvalidReserves { .. } | PricingError::InvalidPool { .. } => {
                CarbonError::InvalidReserves(err.to_string())
            }
            PricingError::InvalidFeeRate(_) | PricingError::InvalidSeries(_) => {
                CarbonError::InvalidConfig(err.to_string())
            }
        }
    }
}

/// Result type for service operations
pub type CarbonResult<T> = Result<T, CarbonError>;
