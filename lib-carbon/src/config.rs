//! Client configuration
//!
//! Loaded from TOML; every field has a default so a partial file works.

use std::fs;
use std::path::Path;
use std::time::Duration;

use lib_market::{RandomWalkConfig, ReservePair, DEFAULT_FEE_RATE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{CarbonError, CarbonResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonConfig {
    // =========================================================================
    // Market
    // =========================================================================
    /// Swap fee levied on the input leg, in [0, 1)
    pub fee_rate: Decimal,
    /// Carbon-credit token symbol
    pub base_asset: String,
    /// Settlement asset symbol
    pub quote_asset: String,
    /// Pool served by the in-memory reserve source
    pub pool: ReservePair,
    /// Simulated price history
    pub price_walk: RandomWalkConfig,

    // =========================================================================
    // Swaps
    // =========================================================================
    /// Fail swaps whose output falls below the slippage bound
    pub enforce_slippage: bool,
    /// Tolerance used when the caller does not pass one, in percent
    pub default_slippage_percent: Decimal,

    // =========================================================================
    // Staking
    // =========================================================================
    /// Annual yield in percent carried on stake records
    pub staking_yield_rate: Decimal,

    // =========================================================================
    // Collaborators
    // =========================================================================
    /// Deadline for reserve lookups and content uploads
    pub collaborator_timeout_ms: u64,
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            base_asset: "CCT".to_string(),
            quote_asset: "USDC".to_string(),
            pool: ReservePair {
                base_reserve: Decimal::new(1_000_000, 0),
                quote_reserve: Decimal::new(15_500_000, 0),
            },
            price_walk: RandomWalkConfig::default(),

            enforce_slippage: false,
            default_slippage_percent: Decimal::new(5, 1), // 0.5%

            staking_yield_rate: Decimal::new(125, 1), // 12.5%

            collaborator_timeout_ms: 5_000,
        }
    }
}

impl CarbonConfig {
    /// Short deterministic history and a tight deadline for tests
    pub fn for_testing() -> Self {
        Self {
            price_walk: RandomWalkConfig {
                days: 7,
                seed: 7,
                ..RandomWalkConfig::default()
            },
            collaborator_timeout_ms: 250,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> CarbonResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| CarbonError::InvalidConfig(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> CarbonResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            CarbonError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> CarbonResult<()> {
        if self.fee_rate < Decimal::ZERO || self.fee_rate >= Decimal::ONE {
            return Err(CarbonError::InvalidConfig(format!(
                "fee_rate must be in [0, 1), got {}",
                self.fee_rate
            )));
        }
        if self.base_asset.trim().is_empty() || self.quote_asset.trim().is_empty() {
            return Err(CarbonError::InvalidConfig(
                "asset symbols must not be empty".to_string(),
            ));
        }
        if self.base_asset == self.quote_asset {
            return Err(CarbonError::InvalidConfig(format!(
                "base and quote asset are both '{}'",
                self.base_asset
            )));
        }
        if self.default_slippage_percent < Decimal::ZERO
            || self.default_slippage_percent > Decimal::ONE_HUNDRED
        {
            return Err(CarbonError::InvalidConfig(format!(
                "default_slippage_percent must be in [0, 100], got {}",
                self.default_slippage_percent
            )));
        }
        if self.staking_yield_rate < Decimal::ZERO {
            return Err(CarbonError::InvalidConfig(format!(
                "staking_yield_rate must not be negative, got {}",
                self.staking_yield_rate
            )));
        }
        if self.collaborator_timeout_ms == 0 {
            return Err(CarbonError::InvalidConfig(
                "collaborator_timeout_ms must be positive".to_string(),
            ));
        }
        self.pool.validate()?;
        self.price_walk.validate()?;
        Ok(())
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }
}
