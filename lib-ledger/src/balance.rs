//! Balance bookkeeping
//!
//! ## Invariant B1: Non-negativity
//! `liquid`, `staked` and `pending_rewards` are `>= 0` after every call.
//! Every mutation checks its precondition first and either applies fully or
//! returns an error with the balance untouched.
//!
//! ## Invariant B2: Stake Conservation
//! `move_liquid_to_staked` / `move_staked_to_liquid` leave `liquid + staked`
//! unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};

/// Snapshot of the actor's holdings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Freely spendable tokens
    pub liquid: Decimal,
    /// Tokens locked in staking
    pub staked: Decimal,
    /// Rewards accrued but not yet claimed
    pub pending_rewards: Decimal,
}

impl Balance {
    /// `liquid + staked`
    pub fn total_holdings(&self) -> Decimal {
        self.liquid + self.staked
    }
}

/// Exclusive owner of the actor's [`Balance`]
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    balance: Balance,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only snapshot
    pub fn balance(&self) -> Balance {
        self.balance
    }

    /// Decrease liquid balance
    pub fn debit_liquid(&mut self, amount: Decimal) -> LedgerResult<()> {
        require_positive(amount)?;
        if amount > self.balance.liquid {
            return Err(LedgerError::InsufficientBalance {
                available: self.balance.liquid,
                requested: amount,
            });
        }
        self.balance.liquid -= amount;
        Ok(())
    }

    /// Increase liquid balance
    pub fn credit_liquid(&mut self, amount: Decimal) -> LedgerResult<()> {
        require_positive(amount)?;
        self.balance.liquid = self
            .balance
            .liquid
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Lock liquid tokens into staking
    pub fn move_liquid_to_staked(&mut self, amount: Decimal) -> LedgerResult<()> {
        require_positive(amount)?;
        if amount > self.balance.liquid {
            return Err(LedgerError::InsufficientBalance {
                available: self.balance.liquid,
                requested: amount,
            });
        }
        let staked = self
            .balance
            .staked
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balance.liquid -= amount;
        self.balance.staked = staked;
        Ok(())
    }

    /// Release staked tokens back to liquid
    pub fn move_staked_to_liquid(&mut self, amount: Decimal) -> LedgerResult<()> {
        require_positive(amount)?;
        if amount > self.balance.staked {
            return Err(LedgerError::InsufficientStake {
                available: self.balance.staked,
                requested: amount,
            });
        }
        let liquid = self
            .balance
            .liquid
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balance.staked -= amount;
        self.balance.liquid = liquid;
        Ok(())
    }

    /// Add accrued rewards
    pub fn credit_rewards(&mut self, amount: Decimal) -> LedgerResult<()> {
        require_positive(amount)?;
        self.balance.pending_rewards = self
            .balance
            .pending_rewards
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Zero pending rewards, returning what was pending
    pub fn clear_rewards(&mut self) -> Decimal {
        std::mem::replace(&mut self.balance.pending_rewards, Decimal::ZERO)
    }
}

fn require_positive(amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}
