//! Carbon Market Pricing
//!
//! Pricing primitives for the carbon-credit marketplace.
//!
//! # Key Types
//!
//! - [`ReservePair`]: The pool backing swaps (base = carbon token, quote = settlement asset)
//! - [`PricingEngine`]: Fee-aware constant-product quoting plus the running price series
//! - [`PriceSeries`]: Daily `{date, price, volume}` points, generated by a bounded random walk
//!
//! # Quoting
//!
//! Use [`quote_swap_output`] for a one-off quote with an explicit fee, or
//! [`PricingEngine::quote_swap_output`] to use the engine's configured fee.

pub mod amm;
pub mod engine;
pub mod errors;
pub mod series;

pub use amm::{quote_swap_output, ReservePair, DEFAULT_FEE_RATE};
pub use engine::PricingEngine;
pub use errors::{PricingError, PricingResult};
pub use series::{PricePoint, PriceSeries, RandomWalkConfig, MAX_WALK_DAYS};

pub use rust_decimal::Decimal;
