//! Constant-product swap math
//!
//! Pricing follows `x * y = k` with the fee levied on the input leg:
//!
//! ```text
//! effective_in = amount_in * (1 - fee_rate)
//! amount_out   = effective_in * reserve_out / (reserve_in + effective_in)
//! ```
//!
//! ## Invariant Q1: Bounded Output
//! For any positive input and positive reserves, `0 < amount_out < reserve_out`.
//! Quotes that cannot honour this (output rounds to zero or to the whole
//! reserve) are rejected rather than clamped.
//!
//! ## Invariant Q2: Monotonicity
//! For fixed reserves and fee, a larger input never yields a smaller output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};

/// Default swap fee (0.3%)
pub const DEFAULT_FEE_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 3);

/// Reserves of the pool backing swaps
///
/// `base_reserve` is the carbon-credit token, `quote_reserve` the settlement
/// asset. Supplied by the market-data collaborator; never mutated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservePair {
    pub base_reserve: Decimal,
    pub quote_reserve: Decimal,
}

impl ReservePair {
    /// Create a reserve pair, rejecting non-positive reserves
    pub fn new(base_reserve: Decimal, quote_reserve: Decimal) -> PricingResult<Self> {
        let pair = Self {
            base_reserve,
            quote_reserve,
        };
        pair.validate()?;
        Ok(pair)
    }

    /// Both reserves must be strictly positive
    pub fn validate(&self) -> PricingResult<()> {
        if self.base_reserve <= Decimal::ZERO || self.quote_reserve <= Decimal::ZERO {
            return Err(PricingError::InvalidPool {
                base_reserve: self.base_reserve,
                quote_reserve: self.quote_reserve,
            });
        }
        Ok(())
    }

    /// Spot price of one base token in quote units (`quote / base`)
    pub fn spot_price(&self) -> PricingResult<Decimal> {
        self.validate()?;
        self.quote_reserve
            .checked_div(self.base_reserve)
            .ok_or(PricingError::Overflow)
    }

    /// Quote base tokens received for `quote_in` settlement units
    pub fn quote_buy(&self, quote_in: Decimal, fee_rate: Decimal) -> PricingResult<Decimal> {
        quote_swap_output(quote_in, self.quote_reserve, self.base_reserve, fee_rate)
    }

    /// Quote settlement units received for `base_in` carbon tokens
    pub fn quote_sell(&self, base_in: Decimal, fee_rate: Decimal) -> PricingResult<Decimal> {
        quote_swap_output(base_in, self.base_reserve, self.quote_reserve, fee_rate)
    }
}

/// Calculate swap output using the constant-product formula
///
/// # Errors
/// - `InvalidAmount`: `amount_in <= 0`
/// - `InvalidReserves`: either reserve `<= 0`
/// - `InvalidFeeRate`: fee outside `[0, 1)`
/// - `ZeroOutputAmount`: output rounds to zero
/// - `InsufficientLiquidity`: output would consume the entire reserve
pub fn quote_swap_output(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_rate: Decimal,
) -> PricingResult<Decimal> {
    if amount_in <= Decimal::ZERO {
        return Err(PricingError::InvalidAmount(amount_in));
    }
    if reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
        return Err(PricingError::InvalidReserves {
            input_reserve: reserve_in,
            output_reserve: reserve_out,
        });
    }
    if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
        return Err(PricingError::InvalidFeeRate(fee_rate));
    }

    let effective_in = amount_in
        .checked_mul(Decimal::ONE - fee_rate)
        .ok_or(PricingError::Overflow)?;

    let numerator = effective_in
        .checked_mul(reserve_out)
        .ok_or(PricingError::Overflow)?;
    let denominator = reserve_in
        .checked_add(effective_in)
        .ok_or(PricingError::Overflow)?;
    let amount_out = numerator
        .checked_div(denominator)
        .ok_or(PricingError::Overflow)?;

    if amount_out <= Decimal::ZERO {
        return Err(PricingError::ZeroOutputAmount);
    }
    if amount_out >= reserve_out {
        return Err(PricingError::InsufficientLiquidity);
    }

    Ok(amount_out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_fee_rate() {
        assert_eq!(DEFAULT_FEE_RATE, dec!(0.003));
    }

    #[test]
    fn test_quote_reference_pool() {
        // effective_in = 997, out = 997 * 1_000_000 / 15_500_997
        let out = quote_swap_output(dec!(1000), dec!(15500000), dec!(1000000), dec!(0.003))
            .unwrap();
        assert_eq!(out.round_dp(2), dec!(64.32));
    }

    #[test]
    fn test_quote_zero_fee_matches_plain_formula() {
        let out = quote_swap_output(dec!(1000), dec!(10000), dec!(10000), Decimal::ZERO).unwrap();
        // 10_000 * 1000 / 11_000
        assert_eq!(out.round_dp(6), dec!(909.090909));
    }

    #[test]
    fn test_quote_rejects_non_positive_input() {
        assert_eq!(
            quote_swap_output(Decimal::ZERO, dec!(10), dec!(10), DEFAULT_FEE_RATE),
            Err(PricingError::InvalidAmount(Decimal::ZERO))
        );
        assert_eq!(
            quote_swap_output(dec!(-1), dec!(10), dec!(10), DEFAULT_FEE_RATE),
            Err(PricingError::InvalidAmount(dec!(-1)))
        );
    }

    #[test]
    fn test_quote_rejects_bad_reserves() {
        let err = quote_swap_output(dec!(1), Decimal::ZERO, dec!(10), DEFAULT_FEE_RATE).unwrap_err();
        assert!(matches!(err, PricingError::InvalidReserves { .. }));

        let err = quote_swap_output(dec!(1), dec!(10), dec!(-5), DEFAULT_FEE_RATE).unwrap_err();
        assert!(matches!(err, PricingError::InvalidReserves { .. }));
    }

    #[test]
    fn test_pool_error_names_reserves_by_role() {
        let pair = ReservePair {
            base_reserve: dec!(1000),
            quote_reserve: Decimal::ZERO,
        };
        let err = pair.validate().unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidPool {
                base_reserve: dec!(1000),
                quote_reserve: Decimal::ZERO,
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid pool: base reserve 1000, quote reserve 0"
        );
    }

    #[test]
    fn test_quote_rejects_bad_fee() {
        assert_eq!(
            quote_swap_output(dec!(1), dec!(10), dec!(10), Decimal::ONE),
            Err(PricingError::InvalidFeeRate(Decimal::ONE))
        );
        assert_eq!(
            quote_swap_output(dec!(1), dec!(10), dec!(10), dec!(-0.1)),
            Err(PricingError::InvalidFeeRate(dec!(-0.1)))
        );
    }

    #[test]
    fn test_quote_higher_fee_gives_less() {
        let low = quote_swap_output(dec!(500), dec!(10000), dec!(10000), dec!(0.001)).unwrap();
        let high = quote_swap_output(dec!(500), dec!(10000), dec!(10000), dec!(0.01)).unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_reserve_pair_spot_and_directions() {
        let pool = ReservePair::new(dec!(1000000), dec!(15500000)).unwrap();
        assert_eq!(pool.spot_price().unwrap(), dec!(15.5));

        let base_out = pool.quote_buy(dec!(1000), DEFAULT_FEE_RATE).unwrap();
        assert_eq!(base_out.round_dp(2), dec!(64.32));

        let quote_out = pool.quote_sell(dec!(10), DEFAULT_FEE_RATE).unwrap();
        // Slightly under 10 * 15.5 because of the fee and price impact
        assert!(quote_out < dec!(155));
        assert!(quote_out > dec!(154));
    }

    #[test]
    fn test_reserve_pair_rejects_zero() {
        assert!(ReservePair::new(Decimal::ZERO, dec!(1)).is_err());
        assert!(ReservePair::new(dec!(1), Decimal::ZERO).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_output_strictly_inside_reserve(
                amount_in in 1u64..1_000_000,
                reserve_in in 1_000u64..1_000_000_000,
                reserve_out in 1_000u64..1_000_000_000,
            ) {
                let out = quote_swap_output(
                    Decimal::from(amount_in),
                    Decimal::from(reserve_in),
                    Decimal::from(reserve_out),
                    DEFAULT_FEE_RATE,
                ).unwrap();
                prop_assert!(out > Decimal::ZERO);
                prop_assert!(out < Decimal::from(reserve_out));
            }

            #[test]
            fn prop_output_increases_with_input(
                amount_in in 1u64..1_000_000,
                extra in 1u64..1_000_000,
                reserve_in in 1_000u64..1_000_000_000,
                reserve_out in 1_000u64..1_000_000_000,
            ) {
                let smaller = quote_swap_output(
                    Decimal::from(amount_in),
                    Decimal::from(reserve_in),
                    Decimal::from(reserve_out),
                    DEFAULT_FEE_RATE,
                ).unwrap();
                let larger = quote_swap_output(
                    Decimal::from(amount_in + extra),
                    Decimal::from(reserve_in),
                    Decimal::from(reserve_out),
                    DEFAULT_FEE_RATE,
                ).unwrap();
                prop_assert!(larger > smaller);
            }
        }
    }
}
