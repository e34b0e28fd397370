//! State shared by every service of one actor

use std::sync::Arc;

use lib_ledger::{ActorId, SharedLedger};
use lib_market::PricingEngine;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::debug;

use crate::collaborators::Session;
use crate::config::CarbonConfig;
use crate::errors::{CarbonError, CarbonResult};

/// Pricing engine shared between the swap service and read models
pub type SharedEngine = Arc<RwLock<PricingEngine>>;

#[derive(Clone)]
pub struct ServiceContext {
    pub ledger: SharedLedger,
    pub session: Arc<dyn Session>,
    pub config: Arc<CarbonConfig>,
}

impl ServiceContext {
    pub fn new(ledger: SharedLedger, session: Arc<dyn Session>, config: Arc<CarbonConfig>) -> Self {
        Self {
            ledger,
            session,
            config,
        }
    }

    /// Connected actor, or `NotConnected`
    pub fn require_actor(&self) -> CarbonResult<ActorId> {
        if !self.session.is_connected() {
            debug!("Rejected: no wallet connected");
            return Err(CarbonError::NotConnected);
        }
        self.session.actor_id().ok_or(CarbonError::NotConnected)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("connected", &self.session.is_connected())
            .field("config", &self.config)
            .finish()
    }
}

/// Reject non-positive amounts before touching any state
pub(crate) fn require_positive(amount: Decimal, what: &str) -> CarbonResult<()> {
    if amount <= Decimal::ZERO {
        debug!("Rejected: {} {} is not positive", what, amount);
        return Err(CarbonError::InvalidAmount(format!(
            "{} must be positive, got {}",
            what, amount
        )));
    }
    Ok(())
}
