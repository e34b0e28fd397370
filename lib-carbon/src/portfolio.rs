//! Dashboard read model

use lib_ledger::{Balance, Ledger};
use lib_market::PricingEngine;
use rust_decimal::Decimal;
use serde::Serialize;

/// Point-in-time view of holdings valued at the current spot price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub balance: Balance,
    pub spot_price: Decimal,
    /// Liquid tokens at spot, 2 decimals
    pub liquid_value: Decimal,
    /// Staked tokens at spot, 2 decimals
    pub staked_value: Decimal,
    pub price_change_percent: Decimal,
    pub total_retired: Decimal,
    pub transaction_count: usize,
}

impl PortfolioSummary {
    pub fn capture(ledger: &Ledger, engine: &PricingEngine) -> Self {
        let balance = ledger.balance();
        let spot_price = engine.current_spot_price();
        Self {
            balance,
            spot_price,
            liquid_value: value_at(balance.liquid, spot_price),
            staked_value: value_at(balance.staked, spot_price),
            price_change_percent: engine.price_change_percent(),
            total_retired: ledger.certificates().total_retired(),
            transaction_count: ledger.recorder().len(),
        }
    }

    pub fn total_value(&self) -> Decimal {
        self.liquid_value + self.staked_value
    }
}

fn value_at(amount: Decimal, price: Decimal) -> Decimal {
    amount
        .checked_mul(price)
        .map(|v| v.round_dp(2))
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lib_ledger::TransactionDetails;
    use lib_market::{PricePoint, PriceSeries};
    use rust_decimal_macros::dec;

    fn engine() -> PricingEngine {
        let series = PriceSeries::from_points(vec![
            PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                price: dec!(16.00),
                volume: dec!(100),
            },
            PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                price: dec!(15.20),
                volume: dec!(100),
            },
        ])
        .unwrap();
        PricingEngine::with_default_fee(series)
    }

    #[test]
    fn test_capture_values_holdings() {
        let mut ledger = Ledger::new();
        ledger.store_mut().credit_liquid(dec!(10)).unwrap();
        ledger.recorder_mut().append(TransactionDetails::Mint { amount: dec!(10) });
        ledger.store_mut().move_liquid_to_staked(dec!(2.5)).unwrap();
        ledger.recorder_mut().append(TransactionDetails::Stake {
            amount: dec!(2.5),
            yield_rate: dec!(12.5),
        });

        let summary = PortfolioSummary::capture(&ledger, &engine());
        assert_eq!(summary.spot_price, dec!(15.20));
        assert_eq!(summary.liquid_value, dec!(114.00));
        assert_eq!(summary.staked_value, dec!(38.00));
        assert_eq!(summary.total_value(), dec!(152.00));
        assert_eq!(summary.price_change_percent, dec!(-5.00));
        assert_eq!(summary.total_retired, Decimal::ZERO);
        assert_eq!(summary.transaction_count, 2);
    }
}
