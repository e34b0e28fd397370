//! Transaction recorder
//!
//! Append-only log of [`TransactionRecord`]s. Records are stored in creation
//! order and always handed out newest first. The log is unbounded; there is
//! no eviction.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::errors::LedgerError;
use crate::transaction::{TransactionDetails, TransactionKind, TransactionRecord};
use crate::types::TransactionId;

/// History filter: everything, or a single kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Kind(TransactionKind),
}

impl TransactionFilter {
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Kind(kind) => record.kind() == *kind,
        }
    }
}

impl From<TransactionKind> for TransactionFilter {
    fn from(kind: TransactionKind) -> Self {
        TransactionFilter::Kind(kind)
    }
}

impl FromStr for TransactionFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TransactionFilter::All);
        }
        s.parse::<TransactionKind>().map(TransactionFilter::Kind)
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionFilter::All => f.write_str("all"),
            TransactionFilter::Kind(kind) => kind.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionRecorder {
    /// Oldest first
    records: Vec<TransactionRecord>,
    last_sequence: u64,
}

impl TransactionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new record with a fresh id and the current timestamp
    pub fn append(&mut self, details: TransactionDetails) -> TransactionRecord {
        self.last_sequence += 1;
        let record = TransactionRecord::new(self.last_sequence, details);
        debug!("Recorded {} {}", record.kind(), record.id());
        self.records.push(record.clone());
        record
    }

    /// Matching records, newest first
    pub fn list(&self, filter: TransactionFilter) -> Vec<TransactionRecord> {
        self.newest_first(filter).cloned().collect()
    }

    /// Up to `limit` most recent records, newest first
    pub fn recent(&self, limit: usize) -> Vec<TransactionRecord> {
        self.newest_first(TransactionFilter::All)
            .take(limit)
            .cloned()
            .collect()
    }

    /// One page of matching records, newest first
    pub fn page(
        &self,
        filter: TransactionFilter,
        offset: usize,
        limit: usize,
    ) -> Vec<TransactionRecord> {
        self.newest_first(filter)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn count(&self, filter: TransactionFilter) -> usize {
        self.records.iter().filter(|r| filter.matches(r)).count()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn latest(&self) -> Option<&TransactionRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn newest_first(
        &self,
        filter: TransactionFilter,
    ) -> impl Iterator<Item = &TransactionRecord> + '_ {
        self.records.iter().rev().filter(move |r| filter.matches(r))
    }
}
