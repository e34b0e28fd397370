//! Wallet service: mint, transfer and governance votes

use lib_ledger::{ActorId, TransactionDetails, TransactionRecord};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::context::{require_positive, ServiceContext};
use crate::errors::{CarbonError, CarbonResult};

#[derive(Debug, Clone)]
pub struct WalletService {
    ctx: ServiceContext,
}

impl WalletService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Credit newly issued tokens
    pub async fn mint(&self, amount: Decimal) -> CarbonResult<TransactionRecord> {
        self.ctx.require_actor()?;
        require_positive(amount, "mint amount")?;

        let mut ledger = self.ctx.ledger.write().await;
        ledger.store_mut().credit_liquid(amount)?;
        let record = ledger
            .recorder_mut()
            .append(TransactionDetails::Mint { amount });

        info!("Minted {} ({})", amount, record.id());
        Ok(record)
    }

    /// Send liquid tokens to another actor
    pub async fn transfer(
        &self,
        recipient: ActorId,
        amount: Decimal,
    ) -> CarbonResult<TransactionRecord> {
        let sender = self.ctx.require_actor()?;
        require_positive(amount, "transfer amount")?;
        if recipient.is_empty() {
            return Err(CarbonError::InvalidRequest(
                "recipient must not be empty".to_string(),
            ));
        }
        if recipient == sender {
            return Err(CarbonError::InvalidRequest(format!(
                "cannot transfer to self ({})",
                sender
            )));
        }

        let mut ledger = self.ctx.ledger.write().await;
        ledger.store_mut().debit_liquid(amount)?;
        let record = ledger.recorder_mut().append(TransactionDetails::Transfer {
            amount,
            recipient: recipient.clone(),
        });

        info!("Transferred {} to {} ({})", amount, recipient, record.id());
        Ok(record)
    }

    /// Vote on a proposal weighted by liquid + staked holdings
    pub async fn vote(
        &self,
        proposal_id: &str,
        support: bool,
    ) -> CarbonResult<TransactionRecord> {
        self.ctx.require_actor()?;
        let proposal_id = proposal_id.trim();
        if proposal_id.is_empty() {
            return Err(CarbonError::InvalidRequest(
                "proposal id must not be empty".to_string(),
            ));
        }

        let mut ledger = self.ctx.ledger.write().await;
        let weight = ledger.balance().total_holdings();
        if weight <= Decimal::ZERO {
            debug!("Rejected vote on {}: no holdings", proposal_id);
            return Err(CarbonError::InsufficientBalance {
                available: Decimal::ZERO,
                requested: Decimal::ZERO,
            });
        }
        let record = ledger.recorder_mut().append(TransactionDetails::Vote {
            proposal_id: proposal_id.to_string(),
            support,
            weight,
        });

        info!(
            "Voted {} on {} with weight {} ({})",
            if support { "for" } else { "against" },
            proposal_id,
            weight,
            record.id()
        );
        Ok(record)
    }
}
