//! Identifier newtypes

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of the connected actor (wallet address, session id, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction identifier: `TX-<sequence>-<uuid fragment>`
///
/// The zero-padded sequence makes ids sort in creation order; the uuid
/// fragment keeps ids from separate ledgers distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate(sequence: u64) -> Self {
        let fragment = Uuid::new_v4().simple().to_string();
        Self(format!("TX-{:010}-{}", sequence, &fragment[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Retirement certificate identifier: `CERT-<uuid>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(String);

impl CertificateId {
    pub fn generate() -> Self {
        Self(format!("CERT-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier returned by the content-addressed store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentAddress(String);

impl ContentAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_format() {
        let id = TransactionId::generate(42);
        assert!(id.as_str().starts_with("TX-0000000042-"));
        assert_eq!(id.as_str().len(), "TX-0000000042-".len() + 8);
    }

    #[test]
    fn test_transaction_ids_sort_by_sequence() {
        let a = TransactionId::generate(9);
        let b = TransactionId::generate(10);
        assert!(a.as_str() < b.as_str());
    }

    #[test]
    fn test_certificate_ids_unique() {
        assert_ne!(CertificateId::generate(), CertificateId::generate());
        assert!(CertificateId::generate().as_str().starts_with("CERT-"));
    }

    #[test]
    fn test_blank_actor_is_empty() {
        assert!(ActorId::new("  ").is_empty());
        assert!(!ActorId::new("0xabc").is_empty());
    }
}
