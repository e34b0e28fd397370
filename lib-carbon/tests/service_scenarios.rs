//! End-to-end service scenarios over in-memory collaborators

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use lib_carbon::{
    CarbonConfig, CarbonDesk, CarbonError, Collaborators, ErrorKind, MemoryContentStore,
    StaticReserveSource, WalletSession,
};
use lib_ledger::{ActorId, TransactionFilter, TransactionKind};
use lib_market::{PricingEngine, ReservePair};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Harness {
    desk: CarbonDesk,
    reserves: Arc<StaticReserveSource>,
    store: Arc<MemoryContentStore>,
    session: Arc<WalletSession>,
}

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn harness(config: CarbonConfig) -> Harness {
    let reserves = Arc::new(StaticReserveSource::new(config.pool));
    let store = Arc::new(MemoryContentStore::new());
    let session = Arc::new(WalletSession::connected(ActorId::new("0xA11CE")));
    let engine = PricingEngine::simulated(config.fee_rate, &config.price_walk, end_date()).unwrap();
    let desk = CarbonDesk::new(
        config,
        Collaborators {
            reserves: reserves.clone(),
            content_store: store.clone(),
            session: session.clone(),
        },
        engine,
    )
    .unwrap();
    Harness {
        desk,
        reserves,
        store,
        session,
    }
}

#[tokio::test]
async fn stake_then_unstake_restores_balance_with_two_records() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(100)).await.unwrap();
    let before = h.desk.balance().await;
    let records_before = h.desk.recent(usize::MAX).await.len();

    h.desk.staking().stake(dec!(37.5)).await.unwrap();
    h.desk.staking().unstake(dec!(37.5)).await.unwrap();

    assert_eq!(h.desk.balance().await, before);
    let history = h.desk.recent(usize::MAX).await;
    assert_eq!(history.len() - records_before, 2);
    assert_eq!(history[0].kind(), TransactionKind::Unstake);
    assert_eq!(history[1].kind(), TransactionKind::Stake);
}

#[tokio::test]
async fn retire_debits_and_issues_one_certificate() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(12)).await.unwrap();

    let outcome = h
        .desk
        .retirement()
        .retire(dec!(5), Some("Office electricity 2024".to_string()))
        .await
        .unwrap();

    assert_eq!(h.desk.balance().await.liquid, dec!(7));
    assert_eq!(h.desk.history(TransactionKind::Retire.into()).await.len(), 1);

    let certificates = h.desk.certificates().await;
    assert_eq!(certificates.len(), 1);
    assert_eq!(certificates[0], outcome.certificate);
    assert!(!certificates[0].content_address.is_empty());
    assert_eq!(certificates[0].owner, ActorId::new("0xA11CE"));
    assert_eq!(h.store.len().await, 1);
    assert_eq!(h.desk.portfolio().await.total_retired, dec!(5));
}

#[tokio::test]
async fn claim_without_rewards_fails() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(3)).await.unwrap();

    let err = h.desk.staking().claim_rewards().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NothingToClaim);
    assert_eq!(h.desk.balance().await.liquid, dec!(3));
}

#[tokio::test]
async fn oversell_fails_without_new_records() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(2)).await.unwrap();
    let before = h.desk.recent(usize::MAX).await.len();

    let err = h.desk.swap().sell(dec!(2.01), dec!(0.5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert_eq!(h.desk.recent(usize::MAX).await.len(), before);
}

#[tokio::test]
async fn buy_history_is_ordered_subset() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(50)).await.unwrap();
    h.desk.swap().buy(dec!(100), dec!(0.5)).await.unwrap();
    h.desk.staking().stake(dec!(10)).await.unwrap();
    h.desk.swap().buy(dec!(200), dec!(0.5)).await.unwrap();
    h.desk.swap().sell(dec!(1), dec!(0.5)).await.unwrap();
    h.desk.swap().buy(dec!(300), dec!(0.5)).await.unwrap();

    let all = h.desk.history(TransactionFilter::All).await;
    let buys = h.desk.history(TransactionKind::Buy.into()).await;
    assert_eq!(buys.len(), 3);
    assert!(buys.iter().all(|r| r.kind() == TransactionKind::Buy));

    let positions: Vec<usize> = buys
        .iter()
        .map(|b| all.iter().position(|r| r.id() == b.id()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(buys[0].sequence() > buys[1].sequence());
}

#[tokio::test]
async fn disconnected_session_rejects_every_operation() {
    let h = harness(CarbonConfig::for_testing());
    h.session.disconnect();

    assert_eq!(h.desk.wallet().mint(dec!(1)).await, Err(CarbonError::NotConnected));
    assert_eq!(
        h.desk.swap().buy(dec!(1), dec!(0.5)).await.map(|_| ()),
        Err(CarbonError::NotConnected)
    );
    assert_eq!(
        h.desk.staking().stake(dec!(1)).await.map(|_| ()),
        Err(CarbonError::NotConnected)
    );
    assert_eq!(
        h.desk.retirement().retire(dec!(1), None).await.map(|_| ()),
        Err(CarbonError::NotConnected)
    );
}

#[tokio::test(start_paused = true)]
async fn reserve_timeout_leaves_state_and_is_retryable() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(10)).await.unwrap();
    h.reserves.latency().set_delay(Duration::from_secs(60));

    let err = h.desk.swap().sell(dec!(4), dec!(0.5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CollaboratorTimeout);
    assert!(err.is_retryable());
    assert_eq!(h.desk.balance().await.liquid, dec!(10));
    assert_eq!(h.desk.recent(usize::MAX).await.len(), 1);

    h.reserves.latency().set_delay(Duration::ZERO);
    h.desk.swap().sell(dec!(4), dec!(0.5)).await.unwrap();
    assert_eq!(h.desk.balance().await.liquid, dec!(6));
}

#[tokio::test]
async fn storage_failure_leaves_state() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(10)).await.unwrap();
    h.store.latency().set_failing(true);

    let err = h.desk.retirement().retire(dec!(3), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert_eq!(h.desk.balance().await.liquid, dec!(10));
    assert!(h.desk.certificates().await.is_empty());
    assert_eq!(h.desk.recent(usize::MAX).await.len(), 1);
}

#[tokio::test]
async fn invalid_pool_rejects_swap() {
    let h = harness(CarbonConfig::for_testing());
    h.reserves
        .set_reserves(ReservePair {
            base_reserve: Decimal::ZERO,
            quote_reserve: dec!(100),
        })
        .await;

    let err = h.desk.swap().buy(dec!(10), dec!(0.5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidReserves);
    assert!(h.desk.recent(usize::MAX).await.is_empty());
}

#[tokio::test]
async fn slippage_is_advisory_by_default() {
    let h = harness(CarbonConfig::for_testing());
    let outcome = h.desk.swap().buy(dec!(500000), dec!(0.1)).await.unwrap();
    assert!(outcome.output_amount < dec!(500000) / dec!(15.5));
}

#[tokio::test]
async fn enforced_slippage_rejects_before_mutation() {
    let config = CarbonConfig {
        enforce_slippage: true,
        ..CarbonConfig::for_testing()
    };
    let h = harness(config);
    h.desk.wallet().mint(dec!(100)).await.unwrap();

    let err = h.desk.swap().sell(dec!(100), dec!(0.1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SlippageExceeded);
    assert_eq!(h.desk.balance().await.liquid, dec!(100));

    h.desk.swap().sell(dec!(100), dec!(1)).await.unwrap();
    assert_eq!(h.desk.balance().await.liquid, Decimal::ZERO);
}

#[tokio::test]
async fn swaps_accumulate_daily_volume() {
    let h = harness(CarbonConfig::for_testing());
    h.desk.wallet().mint(dec!(10)).await.unwrap();
    let before = h.desk.price_history(1).await[0].volume;

    h.desk.swap().sell(dec!(10), dec!(0.5)).await.unwrap();
    assert_eq!(h.desk.price_history(1).await[0].volume, before + dec!(10));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_service_calls_keep_balances_non_negative(
        ops in prop::collection::vec((0u8..6, 1u32..5_000), 1..40)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        runtime.block_on(async {
            let h = harness(CarbonConfig::for_testing());
            for (op, raw) in ops {
                let amount = Decimal::new(i64::from(raw), 2);
                let before = h.desk.balance().await;
                let records = h.desk.recent(usize::MAX).await.len();
                let result = match op {
                    0 => h.desk.wallet().mint(amount).await.map(|_| ()),
                    1 => h.desk.swap().sell(amount, dec!(0.5)).await.map(|_| ()),
                    2 => h.desk.staking().stake(amount).await.map(|_| ()),
                    3 => h.desk.staking().unstake(amount).await.map(|_| ()),
                    4 => h.desk.retirement().retire(amount, None).await.map(|_| ()),
                    _ => h.desk.staking().claim_rewards().await.map(|_| ()),
                };

                let after = h.desk.balance().await;
                prop_assert!(after.liquid >= Decimal::ZERO);
                prop_assert!(after.staked >= Decimal::ZERO);
                prop_assert!(after.pending_rewards >= Decimal::ZERO);

                let records_after = h.desk.recent(usize::MAX).await.len();
                if result.is_err() {
                    prop_assert_eq!(after, before);
                    prop_assert_eq!(records_after, records);
                } else {
                    prop_assert_eq!(records_after, records + 1);
                }
            }
            Ok(())
        })?;
    }
}
