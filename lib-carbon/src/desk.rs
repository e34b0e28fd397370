//! Carbon desk
//!
//! Wires one ledger, one pricing engine and the collaborators into the four
//! services. This is the entry point UI and CLI callers hold on to.

use std::sync::Arc;

use chrono::NaiveDate;
use lib_ledger::{
    ActorId, Balance, Ledger, RetirementCertificate, SharedLedger, TransactionFilter,
    TransactionRecord,
};
use lib_market::{PricePoint, PricingEngine};
use tokio::sync::RwLock;
use tracing::info;

use crate::collaborators::{ContentStore, ReserveSource, Session};
use crate::config::CarbonConfig;
use crate::context::{ServiceContext, SharedEngine};
use crate::errors::CarbonResult;
use crate::memory::{MemoryContentStore, StaticReserveSource, WalletSession};
use crate::portfolio::PortfolioSummary;
use crate::retirement::RetirementService;
use crate::staking::StakingService;
use crate::swap::SwapService;
use crate::wallet::WalletService;

/// External services the desk talks to
#[derive(Clone)]
pub struct Collaborators {
    pub reserves: Arc<dyn ReserveSource>,
    pub content_store: Arc<dyn ContentStore>,
    pub session: Arc<dyn Session>,
}

impl Collaborators {
    /// In-memory collaborators serving the configured pool, session connected
    pub fn in_memory(config: &CarbonConfig, actor: ActorId) -> Self {
        Self {
            reserves: Arc::new(StaticReserveSource::new(config.pool)),
            content_store: Arc::new(MemoryContentStore::new()),
            session: Arc::new(WalletSession::connected(actor)),
        }
    }
}

pub struct CarbonDesk {
    config: Arc<CarbonConfig>,
    ledger: SharedLedger,
    engine: SharedEngine,
    swap: SwapService,
    staking: StakingService,
    retirement: RetirementService,
    wallet: WalletService,
}

impl CarbonDesk {
    /// Build a desk over a fresh ledger
    pub fn new(
        config: CarbonConfig,
        collaborators: Collaborators,
        engine: PricingEngine,
    ) -> CarbonResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let ledger = Ledger::shared();
        let engine = Arc::new(RwLock::new(engine));

        let ctx = ServiceContext::new(ledger.clone(), collaborators.session, config.clone());
        let desk = Self {
            swap: SwapService::new(ctx.clone(), engine.clone(), collaborators.reserves),
            staking: StakingService::new(ctx.clone()),
            retirement: RetirementService::new(ctx.clone(), collaborators.content_store),
            wallet: WalletService::new(ctx),
            config,
            ledger,
            engine,
        };

        info!(
            "Carbon desk ready: {}/{} pool, fee {}",
            desk.config.base_asset, desk.config.quote_asset, desk.config.fee_rate
        );
        Ok(desk)
    }

    /// Desk over in-memory collaborators and a simulated price history
    /// ending on `end_date`
    pub fn simulated(
        config: CarbonConfig,
        actor: ActorId,
        end_date: NaiveDate,
    ) -> CarbonResult<Self> {
        config.validate()?;
        let engine = PricingEngine::simulated(config.fee_rate, &config.price_walk, end_date)?;
        let collaborators = Collaborators::in_memory(&config, actor);
        Self::new(config, collaborators, engine)
    }

    pub fn config(&self) -> &CarbonConfig {
        &self.config
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn swap(&self) -> &SwapService {
        &self.swap
    }

    pub fn staking(&self) -> &StakingService {
        &self.staking
    }

    pub fn retirement(&self) -> &RetirementService {
        &self.retirement
    }

    pub fn wallet(&self) -> &WalletService {
        &self.wallet
    }

    pub async fn balance(&self) -> Balance {
        self.ledger.read().await.balance()
    }

    /// Newest first
    pub async fn history(&self, filter: TransactionFilter) -> Vec<TransactionRecord> {
        self.ledger.read().await.recorder().list(filter)
    }

    pub async fn recent(&self, limit: usize) -> Vec<TransactionRecord> {
        self.ledger.read().await.recorder().recent(limit)
    }

    /// Newest first
    pub async fn certificates(&self) -> Vec<RetirementCertificate> {
        self.ledger.read().await.certificates().all()
    }

    pub async fn price_history(&self, window_days: usize) -> Vec<PricePoint> {
        self.engine.read().await.price_history(window_days)
    }

    pub async fn portfolio(&self) -> PortfolioSummary {
        let ledger = self.ledger.read().await;
        let engine = self.engine.read().await;
        PortfolioSummary::capture(&ledger, &engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn desk() -> CarbonDesk {
        CarbonDesk::simulated(
            CarbonConfig::for_testing(),
            ActorId::new("0xA11CE"),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_simulated_desk_shares_one_ledger() {
        let desk = desk();
        desk.wallet().mint(dec!(20)).await.unwrap();
        desk.staking().stake(dec!(5)).await.unwrap();
        desk.swap().sell(dec!(1), dec!(1)).await.unwrap();

        let balance = desk.balance().await;
        assert_eq!(balance.liquid, dec!(14));
        assert_eq!(balance.staked, dec!(5));
        assert_eq!(desk.recent(10).await.len(), 3);
    }

    #[tokio::test]
    async fn test_price_history_uses_walk_length() {
        let desk = desk();
        assert_eq!(desk.price_history(365).await.len(), 7);
        let portfolio = desk.portfolio().await;
        assert_eq!(portfolio.transaction_count, 0);
        assert!(portfolio.spot_price > dec!(0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CarbonConfig {
            fee_rate: dec!(2),
            ..CarbonConfig::for_testing()
        };
        assert!(CarbonDesk::simulated(
            config,
            ActorId::new("0xA11CE"),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        )
        .is_err());
    }
}
