//! Daily price series
//!
//! The dashboard charts a daily `{date, price, volume}` series. In this
//! client the series is simulated: a bounded random walk seeded from a
//! fixed value so the same seed always produces the same history.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};

/// Longest walk `simulate` will generate (ten years of days)
pub const MAX_WALK_DAYS: u32 = 3_650;

/// One day of market data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
    pub volume: Decimal,
}

/// Parameters for the simulated price walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalkConfig {
    /// Price of the first generated day
    pub start_price: Decimal,
    /// Lower clamp of the band
    pub floor: Decimal,
    /// Upper clamp of the band
    pub ceiling: Decimal,
    /// Largest daily move in percent (e.g. 5 = ±5%)
    pub max_step_percent: Decimal,
    /// Daily volume lower bound (whole tokens)
    pub min_volume: u64,
    /// Daily volume upper bound (whole tokens)
    pub max_volume: u64,
    /// Number of days to generate
    pub days: u32,
    /// RNG seed
    pub seed: u64,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            start_price: Decimal::new(1550, 2), // 15.50
            floor: Decimal::new(1000, 2),       // 10.00
            ceiling: Decimal::new(2500, 2),     // 25.00
            max_step_percent: Decimal::new(5, 0),
            min_volume: 50_000,
            max_volume: 250_000,
            days: 30,
            seed: 42,
        }
    }
}

impl RandomWalkConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if self.floor <= Decimal::ZERO {
            return Err(PricingError::InvalidSeries(format!(
                "floor must be positive, got {}",
                self.floor
            )));
        }
        if self.floor > self.ceiling {
            return Err(PricingError::InvalidSeries(format!(
                "floor {} above ceiling {}",
                self.floor, self.ceiling
            )));
        }
        if self.start_price < self.floor || self.start_price > self.ceiling {
            return Err(PricingError::InvalidSeries(format!(
                "start price {} outside band [{}, {}]",
                self.start_price, self.floor, self.ceiling
            )));
        }
        if self.max_step_percent < Decimal::ZERO || self.max_step_percent >= Decimal::ONE_HUNDRED {
            return Err(PricingError::InvalidSeries(format!(
                "max step must be in [0, 100), got {}",
                self.max_step_percent
            )));
        }
        if self.min_volume > self.max_volume {
            return Err(PricingError::InvalidSeries(format!(
                "min volume {} above max volume {}",
                self.min_volume, self.max_volume
            )));
        }
        if self.days == 0 || self.days > MAX_WALK_DAYS {
            return Err(PricingError::InvalidSeries(format!(
                "days must be in [1, {}], got {}",
                MAX_WALK_DAYS, self.days
            )));
        }
        Ok(())
    }
}

/// Ordered daily price history, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from explicit points
    ///
    /// Points must be non-empty, strictly ascending by date, with positive
    /// prices and non-negative volumes.
    pub fn from_points(points: Vec<PricePoint>) -> PricingResult<Self> {
        if points.is_empty() {
            return Err(PricingError::InvalidSeries("series is empty".to_string()));
        }
        for point in &points {
            if point.price <= Decimal::ZERO {
                return Err(PricingError::InvalidSeries(format!(
                    "non-positive price {} on {}",
                    point.price, point.date
                )));
            }
            if point.volume < Decimal::ZERO {
                return Err(PricingError::InvalidSeries(format!(
                    "negative volume {} on {}",
                    point.volume, point.date
                )));
            }
        }
        if points.windows(2).any(|w| w[0].date >= w[1].date) {
            return Err(PricingError::InvalidSeries(
                "dates must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { points })
    }

    /// Generate `config.days` points ending on `end_date`
    ///
    /// Each day moves the previous price by a uniform step in
    /// `±max_step_percent` (whole basis points), rounds to cents and clamps
    /// to `[floor, ceiling]`.
    pub fn simulate(config: &RandomWalkConfig, end_date: NaiveDate) -> PricingResult<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let max_step_bps = (config.max_step_percent * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .ok_or(PricingError::Overflow)?;
        let bps_scale = Decimal::new(10_000, 0);

        let mut points = Vec::with_capacity(config.days as usize);
        let mut price = config.start_price;

        for offset in (0..config.days).rev() {
            let date = end_date
                .checked_sub_signed(Duration::days(i64::from(offset)))
                .ok_or_else(|| {
                    PricingError::InvalidSeries(format!(
                        "{} days before {} is out of calendar range",
                        offset, end_date
                    ))
                })?;
            if !points.is_empty() {
                let step_bps = if max_step_bps == 0 {
                    0
                } else {
                    rng.gen_range(-max_step_bps..=max_step_bps)
                };
                let factor = Decimal::ONE + Decimal::from(step_bps) / bps_scale;
                price = price
                    .checked_mul(factor)
                    .ok_or(PricingError::Overflow)?
                    .round_dp(2)
                    .max(config.floor)
                    .min(config.ceiling);
            }
            let volume = Decimal::from(rng.gen_range(config.min_volume..=config.max_volume));
            points.push(PricePoint {
                date,
                price,
                volume,
            });
        }

        Ok(Self { points })
    }

    /// Most recent price
    pub fn spot_price(&self) -> Decimal {
        // Constructors guarantee at least one point
        self.points
            .last()
            .map(|p| p.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Day-over-day change in percent, rounded to 2 decimals
    ///
    /// Returns zero with fewer than two points.
    pub fn change_percent(&self) -> Decimal {
        let n = self.points.len();
        if n < 2 {
            return Decimal::ZERO;
        }
        let today = self.points[n - 1].price;
        let yesterday = self.points[n - 2].price;
        if yesterday.is_zero() {
            return Decimal::ZERO;
        }
        ((today - yesterday) / yesterday * Decimal::ONE_HUNDRED).round_dp(2)
    }

    /// Last `window_days` points, oldest first
    pub fn window(&self, window_days: usize) -> &[PricePoint] {
        let start = self.points.len().saturating_sub(window_days);
        &self.points[start..]
    }

    /// Add traded volume to the most recent point
    pub fn add_volume(&mut self, amount: Decimal) {
        if let Some(last) = self.points.last_mut() {
            last.volume += amount;
        }
    }

    /// Append a new day; dates must keep ascending
    pub fn push(&mut self, point: PricePoint) -> PricingResult<()> {
        if point.price <= Decimal::ZERO {
            return Err(PricingError::InvalidSeries(format!(
                "non-positive price {}",
                point.price
            )));
        }
        if let Some(last) = self.points.last() {
            if point.date <= last.date {
                return Err(PricingError::InvalidSeries(format!(
                    "date {} not after {}",
                    point.date, last.date
                )));
            }
        }
        self.points.push(point);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }
}
