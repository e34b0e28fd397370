//! Staking service
//!
//! Moves tokens between liquid and staked balance and pays out pending
//! rewards. Accrual is driven from outside through [`StakingService::accrue_rewards`].

use lib_ledger::{Balance, TransactionDetails, TransactionRecord};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::context::{require_positive, ServiceContext};
use crate::errors::{CarbonError, CarbonResult};

#[derive(Debug, Clone)]
pub struct StakingService {
    ctx: ServiceContext,
}

impl StakingService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Lock `amount` liquid tokens
    pub async fn stake(&self, amount: Decimal) -> CarbonResult<TransactionRecord> {
        self.ctx.require_actor()?;
        require_positive(amount, "stake amount")?;

        let yield_rate = self.ctx.config.staking_yield_rate;
        let mut ledger = self.ctx.ledger.write().await;
        ledger.store_mut().move_liquid_to_staked(amount)?;
        let record = ledger
            .recorder_mut()
            .append(TransactionDetails::Stake { amount, yield_rate });

        info!("Staked {} at {}% ({})", amount, yield_rate, record.id());
        Ok(record)
    }

    /// Release `amount` staked tokens back to liquid
    pub async fn unstake(&self, amount: Decimal) -> CarbonResult<TransactionRecord> {
        self.ctx.require_actor()?;
        require_positive(amount, "unstake amount")?;

        let mut ledger = self.ctx.ledger.write().await;
        ledger.store_mut().move_staked_to_liquid(amount)?;
        let record = ledger
            .recorder_mut()
            .append(TransactionDetails::Unstake { amount });

        info!("Unstaked {} ({})", amount, record.id());
        Ok(record)
    }

    /// Pay out all pending rewards into liquid balance
    pub async fn claim_rewards(&self) -> CarbonResult<TransactionRecord> {
        self.ctx.require_actor()?;

        let mut ledger = self.ctx.ledger.write().await;
        let pending = ledger.balance().pending_rewards;
        if pending <= Decimal::ZERO {
            debug!("Rejected: no pending rewards");
            return Err(CarbonError::NothingToClaim);
        }

        ledger.store_mut().credit_liquid(pending)?;
        let claimed = ledger.store_mut().clear_rewards();
        let record = ledger
            .recorder_mut()
            .append(TransactionDetails::ClaimRewards { amount: claimed });

        info!("Claimed {} in rewards ({})", claimed, record.id());
        Ok(record)
    }

    /// Credit rewards computed by the external yield-accrual job
    ///
    /// Touches only `pending_rewards`, so no record is appended.
    pub async fn accrue_rewards(&self, amount: Decimal) -> CarbonResult<Balance> {
        require_positive(amount, "reward amount")?;

        let mut ledger = self.ctx.ledger.write().await;
        ledger.store_mut().credit_rewards(amount)?;
        let balance = ledger.balance();

        debug!(
            "Accrued {} in rewards, {} pending",
            amount, balance.pending_rewards
        );
        Ok(balance)
    }
}
