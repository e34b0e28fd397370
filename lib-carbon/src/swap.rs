//! Swap service
//!
//! Buys and sells the carbon token against the pool. Each call walks
//! `Idle → Validating → Pricing → Settling → Recorded`; a precondition
//! failure ends in `Rejected`, anything later in `Failed`.
//!
//! Reserves are read from the [`ReserveSource`] on every call and never
//! written back. Slippage is advisory unless `enforce_slippage` is set, in
//! which case output is held against the pool's spot price.

use std::fmt;
use std::sync::Arc;

use lib_ledger::{SwapLeg, TransactionDetails, TransactionRecord};
use lib_market::ReservePair;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collaborators::{call_with_deadline, ReserveSource};
use crate::context::{require_positive, ServiceContext, SharedEngine};
use crate::errors::{CarbonError, CarbonResult};

/// Per-call swap state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapPhase {
    Idle,
    Validating,
    Pricing,
    Settling,
    Recorded,
    Rejected,
    Failed,
}

impl SwapPhase {
    /// Terminal phase for an error raised while in `self`
    pub fn on_error(self) -> SwapPhase {
        match self {
            SwapPhase::Idle | SwapPhase::Validating => SwapPhase::Rejected,
            _ => SwapPhase::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SwapPhase::Recorded | SwapPhase::Rejected | SwapPhase::Failed
        )
    }
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapPhase::Idle => "idle",
            SwapPhase::Validating => "validating",
            SwapPhase::Pricing => "pricing",
            SwapPhase::Settling => "settling",
            SwapPhase::Recorded => "recorded",
            SwapPhase::Rejected => "rejected",
            SwapPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a settled swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    /// Base tokens received (buy) or quote units received (sell)
    pub output_amount: Decimal,
    /// `output * (1 - slippage / 100)`
    pub min_acceptable: Decimal,
    pub record: TransactionRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

/// Priced but not yet settled
struct Quote {
    output: Decimal,
    min_acceptable: Decimal,
}

#[derive(Clone)]
pub struct SwapService {
    ctx: ServiceContext,
    engine: SharedEngine,
    reserves: Arc<dyn ReserveSource>,
}

impl SwapService {
    pub fn new(ctx: ServiceContext, engine: SharedEngine, reserves: Arc<dyn ReserveSource>) -> Self {
        Self {
            ctx,
            engine,
            reserves,
        }
    }

    /// Spend `quote_amount` settlement units for carbon tokens
    pub async fn buy(
        &self,
        quote_amount: Decimal,
        max_slippage_percent: Decimal,
    ) -> CarbonResult<SwapOutcome> {
        self.run(Side::Buy, quote_amount, max_slippage_percent).await
    }

    /// Sell `base_amount` carbon tokens for settlement units
    pub async fn sell(
        &self,
        base_amount: Decimal,
        max_slippage_percent: Decimal,
    ) -> CarbonResult<SwapOutcome> {
        self.run(Side::Sell, base_amount, max_slippage_percent).await
    }

    /// Buy with the configured default slippage tolerance
    pub async fn buy_with_default_slippage(&self, quote_amount: Decimal) -> CarbonResult<SwapOutcome> {
        self.buy(quote_amount, self.ctx.config.default_slippage_percent)
            .await
    }

    /// Sell with the configured default slippage tolerance
    pub async fn sell_with_default_slippage(&self, base_amount: Decimal) -> CarbonResult<SwapOutcome> {
        self.sell(base_amount, self.ctx.config.default_slippage_percent)
            .await
    }

    async fn run(
        &self,
        side: Side,
        amount: Decimal,
        max_slippage_percent: Decimal,
    ) -> CarbonResult<SwapOutcome> {
        let mut phase = SwapPhase::Idle;
        let result = self
            .execute(side, amount, max_slippage_percent, &mut phase)
            .await;

        match result {
            Ok(outcome) => {
                phase = SwapPhase::Recorded;
                info!(
                    "Swap {} {}: {} in, {} out ({})",
                    side,
                    outcome.record.id(),
                    amount,
                    outcome.output_amount,
                    phase
                );
                Ok(outcome)
            }
            Err(e) => {
                let terminal = phase.on_error();
                if terminal == SwapPhase::Rejected {
                    debug!("Swap {} {} while {}: {}", side, terminal, phase, e);
                } else {
                    warn!("Swap {} {} while {}: {}", side, terminal, phase, e);
                }
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        side: Side,
        amount: Decimal,
        max_slippage_percent: Decimal,
        phase: &mut SwapPhase,
    ) -> CarbonResult<SwapOutcome> {
        *phase = SwapPhase::Validating;
        self.ctx.require_actor()?;
        require_positive(amount, "swap amount")?;
        if max_slippage_percent < Decimal::ZERO || max_slippage_percent > Decimal::ONE_HUNDRED {
            return Err(CarbonError::InvalidAmount(format!(
                "slippage tolerance must be in [0, 100], got {}",
                max_slippage_percent
            )));
        }
        if side == Side::Sell {
            let available = self.ctx.ledger.read().await.balance().liquid;
            if amount > available {
                return Err(CarbonError::InsufficientBalance {
                    available,
                    requested: amount,
                });
            }
        }

        *phase = SwapPhase::Pricing;
        let reserves = call_with_deadline(
            "reserve source",
            self.ctx.config.collaborator_timeout(),
            self.reserves.reserves(),
            CarbonError::PriceSourceUnavailable,
        )
        .await?;
        let quote = self
            .price(side, amount, max_slippage_percent, &reserves)
            .await?;

        *phase = SwapPhase::Settling;
        let leg = self.leg(side, amount, &quote)?;
        let record = {
            let mut ledger = self.ctx.ledger.write().await;
            let details = match side {
                Side::Buy => {
                    ledger.store_mut().credit_liquid(quote.output)?;
                    TransactionDetails::Buy(leg)
                }
                Side::Sell => {
                    ledger.store_mut().debit_liquid(amount)?;
                    TransactionDetails::Sell(leg)
                }
            };
            ledger.recorder_mut().append(details)
        };

        let base_volume = match side {
            Side::Buy => quote.output,
            Side::Sell => amount,
        };
        self.engine.write().await.record_volume(base_volume);

        Ok(SwapOutcome {
            output_amount: quote.output,
            min_acceptable: quote.min_acceptable,
            record,
        })
    }

    async fn price(
        &self,
        side: Side,
        amount: Decimal,
        max_slippage_percent: Decimal,
        reserves: &ReservePair,
    ) -> CarbonResult<Quote> {
        reserves.validate()?;
        let output = {
            let engine = self.engine.read().await;
            match side {
                Side::Buy => engine.quote_swap_output(
                    amount,
                    reserves.quote_reserve,
                    reserves.base_reserve,
                )?,
                Side::Sell => engine.quote_swap_output(
                    amount,
                    reserves.base_reserve,
                    reserves.quote_reserve,
                )?,
            }
        };

        let tolerance = Decimal::ONE - max_slippage_percent / Decimal::ONE_HUNDRED;
        let min_acceptable = output
            .checked_mul(tolerance)
            .ok_or_else(|| CarbonError::InvalidAmount("slippage bound overflows".to_string()))?;

        if self.ctx.config.enforce_slippage {
            let spot = reserves.spot_price()?;
            let expected = match side {
                Side::Buy => amount.checked_div(spot),
                Side::Sell => amount.checked_mul(spot),
            }
            .ok_or_else(|| CarbonError::InvalidAmount("expected output overflows".to_string()))?;
            let floor = expected * tolerance;
            if output < floor {
                return Err(CarbonError::SlippageExceeded {
                    output,
                    min_acceptable: floor,
                });
            }
        }

        Ok(Quote {
            output,
            min_acceptable,
        })
    }

    fn leg(&self, side: Side, amount: Decimal, quote: &Quote) -> CarbonResult<SwapLeg> {
        let config = &self.ctx.config;
        let (input_asset, output_asset, unit_price) = match side {
            Side::Buy => (
                &config.quote_asset,
                &config.base_asset,
                amount.checked_div(quote.output),
            ),
            Side::Sell => (
                &config.base_asset,
                &config.quote_asset,
                quote.output.checked_div(amount),
            ),
        };
        let unit_price = unit_price
            .ok_or_else(|| CarbonError::InvalidAmount("unit price overflows".to_string()))?;
        Ok(SwapLeg {
            input_amount: amount,
            input_asset: input_asset.clone(),
            output_amount: quote.output,
            output_asset: output_asset.clone(),
            unit_price,
            min_output: quote.min_acceptable,
        })
    }
}
