//! Pricing engine
//!
//! Couples the configured swap fee with the running price series. Quoting is
//! a pure function of its inputs; the series is the only mutable part and
//! only ever grows or accumulates volume.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::amm::{quote_swap_output, DEFAULT_FEE_RATE};
use crate::errors::{PricingError, PricingResult};
use crate::series::{PricePoint, PriceSeries, RandomWalkConfig};

#[derive(Debug, Clone)]
pub struct PricingEngine {
    fee_rate: Decimal,
    series: PriceSeries,
}

impl PricingEngine {
    /// Create an engine over an existing series
    pub fn new(fee_rate: Decimal, series: PriceSeries) -> PricingResult<Self> {
        if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
            return Err(PricingError::InvalidFeeRate(fee_rate));
        }
        Ok(Self { fee_rate, series })
    }

    /// Create an engine with a simulated history ending on `end_date`
    pub fn simulated(
        fee_rate: Decimal,
        walk: &RandomWalkConfig,
        end_date: NaiveDate,
    ) -> PricingResult<Self> {
        let series = PriceSeries::simulate(walk, end_date)?;
        debug!(
            "Simulated {} days of prices ending {} (seed {})",
            series.len(),
            end_date,
            walk.seed
        );
        Self::new(fee_rate, series)
    }

    /// Engine with the default 0.3% fee
    pub fn with_default_fee(series: PriceSeries) -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            series,
        }
    }

    /// Quote output for `input_amount` against the given reserves
    pub fn quote_swap_output(
        &self,
        input_amount: Decimal,
        input_reserve: Decimal,
        output_reserve: Decimal,
    ) -> PricingResult<Decimal> {
        quote_swap_output(input_amount, input_reserve, output_reserve, self.fee_rate)
    }

    /// Latest price in the series
    pub fn current_spot_price(&self) -> Decimal {
        self.series.spot_price()
    }

    /// `(today - yesterday) / yesterday * 100`, 2 decimals
    pub fn price_change_percent(&self) -> Decimal {
        self.series.change_percent()
    }

    /// Up to `window_days` most recent points, most recent last
    pub fn price_history(&self, window_days: usize) -> Vec<PricePoint> {
        self.series.window(window_days).to_vec()
    }

    /// Accumulate settled trade volume on the latest day
    pub fn record_volume(&mut self, amount: Decimal) {
        if amount > Decimal::ZERO {
            self.series.add_volume(amount);
        }
    }

    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }
}
