//! Transaction records
//!
//! A record is created once by the recorder and never changes afterwards.
//! The payload is one variant per kind carrying exactly that kind's fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::types::{ActorId, CertificateId, TransactionId};

/// Enumerated transaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Mint,
    Retire,
    Buy,
    Sell,
    Stake,
    Unstake,
    ClaimRewards,
    Transfer,
    Vote,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 9] = [
        TransactionKind::Mint,
        TransactionKind::Retire,
        TransactionKind::Buy,
        TransactionKind::Sell,
        TransactionKind::Stake,
        TransactionKind::Unstake,
        TransactionKind::ClaimRewards,
        TransactionKind::Transfer,
        TransactionKind::Vote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Mint => "mint",
            TransactionKind::Retire => "retire",
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
            TransactionKind::Stake => "stake",
            TransactionKind::Unstake => "unstake",
            TransactionKind::ClaimRewards => "claim_rewards",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Vote => "vote",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        // "burn" is the on-chain name for a retirement
        if normalized == "burn" {
            return Ok(TransactionKind::Retire);
        }
        TransactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| LedgerError::UnknownKind(s.to_string()))
    }
}

/// Lifecycle status of a record
///
/// Failed operations surface as errors instead of records, so every stored
/// record is `Completed`. `Failed` exists for callers importing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

/// Both legs of a settled swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapLeg {
    pub input_amount: Decimal,
    pub input_asset: String,
    pub output_amount: Decimal,
    pub output_asset: String,
    /// Quote units paid or received per base token
    pub unit_price: Decimal,
    /// Lowest output the caller's slippage tolerance accepts
    pub min_output: Decimal,
}

/// Per-kind payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionDetails {
    Mint {
        amount: Decimal,
    },
    Retire {
        amount: Decimal,
        certificate_id: CertificateId,
    },
    Buy(SwapLeg),
    Sell(SwapLeg),
    Stake {
        amount: Decimal,
        /// Annual yield in percent applicable at stake time
        yield_rate: Decimal,
    },
    Unstake {
        amount: Decimal,
    },
    ClaimRewards {
        amount: Decimal,
    },
    Transfer {
        amount: Decimal,
        recipient: ActorId,
    },
    Vote {
        proposal_id: String,
        support: bool,
        weight: Decimal,
    },
}

impl TransactionDetails {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetails::Mint { .. } => TransactionKind::Mint,
            TransactionDetails::Retire { .. } => TransactionKind::Retire,
            TransactionDetails::Buy(_) => TransactionKind::Buy,
            TransactionDetails::Sell(_) => TransactionKind::Sell,
            TransactionDetails::Stake { .. } => TransactionKind::Stake,
            TransactionDetails::Unstake { .. } => TransactionKind::Unstake,
            TransactionDetails::ClaimRewards { .. } => TransactionKind::ClaimRewards,
            TransactionDetails::Transfer { .. } => TransactionKind::Transfer,
            TransactionDetails::Vote { .. } => TransactionKind::Vote,
        }
    }

    /// Carbon-token amount moved by this record
    ///
    /// Buys report base tokens received, sells base tokens given up, votes
    /// their weight.
    pub fn amount(&self) -> Decimal {
        match self {
            TransactionDetails::Mint { amount }
            | TransactionDetails::Retire { amount, .. }
            | TransactionDetails::Stake { amount, .. }
            | TransactionDetails::Unstake { amount }
            | TransactionDetails::ClaimRewards { amount }
            | TransactionDetails::Transfer { amount, .. } => *amount,
            TransactionDetails::Buy(leg) => leg.output_amount,
            TransactionDetails::Sell(leg) => leg.input_amount,
            TransactionDetails::Vote { weight, .. } => *weight,
        }
    }

    /// Certificate id or proposal id this record points at
    pub fn reference_id(&self) -> Option<&str> {
        match self {
            TransactionDetails::Retire { certificate_id, .. } => Some(certificate_id.as_str()),
            TransactionDetails::Vote { proposal_id, .. } => Some(proposal_id.as_str()),
            _ => None,
        }
    }
}

/// Immutable history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    id: TransactionId,
    sequence: u64,
    timestamp: DateTime<Utc>,
    status: TransactionStatus,
    details: TransactionDetails,
}

impl TransactionRecord {
    pub(crate) fn new(sequence: u64, details: TransactionDetails) -> Self {
        Self {
            id: TransactionId::generate(sequence),
            sequence,
            timestamp: Utc::now(),
            status: TransactionStatus::Completed,
            details,
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// Creation order within the recorder, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn details(&self) -> &TransactionDetails {
        &self.details
    }

    pub fn kind(&self) -> TransactionKind {
        self.details.kind()
    }

    pub fn amount(&self) -> Decimal {
        self.details.amount()
    }

    pub fn reference_id(&self) -> Option<&str> {
        self.details.reference_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn leg() -> SwapLeg {
        SwapLeg {
            input_amount: dec!(1000),
            input_asset: "USDC".to_string(),
            output_amount: dec!(64.32),
            output_asset: "CCT".to_string(),
            unit_price: dec!(15.55),
            min_output: dec!(64.0),
        }
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in TransactionKind::ALL {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
        assert_eq!("burn".parse::<TransactionKind>().unwrap(), TransactionKind::Retire);
        assert_eq!(" BUY ".parse::<TransactionKind>().unwrap(), TransactionKind::Buy);
        assert!("teleport".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_details_kind_and_amount() {
        let buy = TransactionDetails::Buy(leg());
        assert_eq!(buy.kind(), TransactionKind::Buy);
        assert_eq!(buy.amount(), dec!(64.32));

        let sell = TransactionDetails::Sell(leg());
        assert_eq!(sell.amount(), dec!(1000));

        let vote = TransactionDetails::Vote {
            proposal_id: "PROP-7".to_string(),
            support: true,
            weight: dec!(12),
        };
        assert_eq!(vote.kind(), TransactionKind::Vote);
        assert_eq!(vote.reference_id(), Some("PROP-7"));
        assert_eq!(TransactionDetails::Mint { amount: dec!(1) }.reference_id(), None);
    }

    #[test]
    fn test_serialized_payload_is_tagged() {
        let details = TransactionDetails::Stake {
            amount: dec!(5),
            yield_rate: dec!(12.5),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["kind"], "stake");

        let buy = serde_json::to_value(TransactionDetails::Buy(leg())).unwrap();
        assert_eq!(buy["kind"], "buy");
        assert_eq!(buy["output_asset"], "CCT");
    }

    #[test]
    fn test_new_record_is_completed() {
        let record = TransactionRecord::new(1, TransactionDetails::Mint { amount: dec!(3) });
        assert_eq!(record.status(), TransactionStatus::Completed);
        assert_eq!(record.sequence(), 1);
        assert_eq!(record.kind(), TransactionKind::Mint);
    }
}
