//! Carbon Credit Ledger
//!
//! Single-actor, process-memory ledger backing the marketplace, staking and
//! retirement flows.
//!
//! # Key Types
//!
//! - [`LedgerStore`]: Liquid / staked / pending-reward balance with checked mutations
//! - [`TransactionRecorder`]: Append-only, newest-first transaction history
//! - [`TransactionRecord`]: Immutable record; payload is a tagged union per kind
//! - [`CertificateRegistry`]: Issued retirement certificates
//! - [`Ledger`] / [`SharedLedger`]: The three above behind one writer lock
//!
//! # Pairing Rule
//!
//! `LedgerStore` never records anything on its own. Every mutation must be
//! followed by a `TransactionRecorder::append` while the same `Ledger` write
//! guard is held, so a balance change and its record become visible together.

pub mod balance;
pub mod certificate;
pub mod errors;
pub mod ledger;
pub mod recorder;
pub mod transaction;
pub mod types;

pub use balance::{Balance, LedgerStore};
pub use certificate::{CertificateDraft, CertificateRegistry, RetirementCertificate};
pub use errors::{LedgerError, LedgerResult};
pub use ledger::{Ledger, SharedLedger};
pub use recorder::{TransactionFilter, TransactionRecorder};
pub use transaction::{
    SwapLeg, TransactionDetails, TransactionKind, TransactionRecord, TransactionStatus,
};
pub use types::{ActorId, CertificateId, ContentAddress, TransactionId};
