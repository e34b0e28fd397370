//! Shared ledger handle
//!
//! Bundles the balance store, transaction log and certificate registry so a
//! single write guard covers a mutation and its record. Services hold a
//! [`SharedLedger`] and never keep the guard across a collaborator call.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::balance::{Balance, LedgerStore};
use crate::certificate::CertificateRegistry;
use crate::recorder::TransactionRecorder;

/// Single-writer handle shared by every service of one actor
pub type SharedLedger = Arc<RwLock<Ledger>>;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    store: LedgerStore,
    recorder: TransactionRecorder,
    certificates: CertificateRegistry,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh ledger behind a lock
    pub fn shared() -> SharedLedger {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn balance(&self) -> Balance {
        self.store.balance()
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LedgerStore {
        &mut self.store
    }

    pub fn recorder(&self) -> &TransactionRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut TransactionRecorder {
        &mut self.recorder
    }

    pub fn certificates(&self) -> &CertificateRegistry {
        &self.certificates
    }

    pub fn certificates_mut(&mut self) -> &mut CertificateRegistry {
        &mut self.certificates
    }
}
