//! Pricing Errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Error during pricing operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("Invalid reserves: input {input_reserve}, output {output_reserve}")]
    InvalidReserves {
        input_reserve: Decimal,
        output_reserve: Decimal,
    },

    #[error("Invalid pool: base reserve {base_reserve}, quote reserve {quote_reserve}")]
    InvalidPool {
        base_reserve: Decimal,
        quote_reserve: Decimal,
    },

    #[error("Fee rate must be in [0, 1), got {0}")]
    InvalidFeeRate(Decimal),

    #[error("Output amount would be zero")]
    ZeroOutputAmount,

    #[error("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),
}

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;
