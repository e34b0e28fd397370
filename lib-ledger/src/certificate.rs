//! Retirement certificates
//!
//! A certificate is drafted before the content upload, serialized, pushed to
//! the content store, and only then issued with the returned address. An
//! issued certificate is never modified or removed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};
use crate::types::{ActorId, CertificateId, ContentAddress};

/// Issued proof of retirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementCertificate {
    pub id: CertificateId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub owner: ActorId,
    pub reason: Option<String>,
    pub content_address: ContentAddress,
}

impl RetirementCertificate {
    /// Start a certificate for `amount` retired by `owner`
    pub fn draft(
        amount: Decimal,
        owner: ActorId,
        reason: Option<String>,
    ) -> LedgerResult<CertificateDraft> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(CertificateDraft {
            id: CertificateId::generate(),
            amount,
            created_at: Utc::now(),
            owner,
            reason,
        })
    }
}

/// Certificate content before it has a content address
///
/// This is exactly what gets uploaded to the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateDraft {
    pub id: CertificateId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub owner: ActorId,
    pub reason: Option<String>,
}

impl CertificateDraft {
    /// Canonical JSON payload for upload
    pub fn to_bytes(&self) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Bind the stored content address
    pub fn issue(self, content_address: ContentAddress) -> LedgerResult<RetirementCertificate> {
        if content_address.is_empty() {
            return Err(LedgerError::EmptyContentAddress);
        }
        Ok(RetirementCertificate {
            id: self.id,
            amount: self.amount,
            created_at: self.created_at,
            owner: self.owner,
            reason: self.reason,
            content_address,
        })
    }
}

/// Issued certificates in creation order
#[derive(Debug, Clone, Default)]
pub struct CertificateRegistry {
    certificates: Vec<RetirementCertificate>,
}

impl CertificateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, certificate: RetirementCertificate) {
        self.certificates.push(certificate);
    }

    pub fn get(&self, id: &CertificateId) -> Option<&RetirementCertificate> {
        self.certificates.iter().find(|c| &c.id == id)
    }

    /// Newest first
    pub fn all(&self) -> Vec<RetirementCertificate> {
        self.certificates.iter().rev().cloned().collect()
    }

    /// Sum of every retired amount
    pub fn total_retired(&self) -> Decimal {
        self.certificates.iter().map(|c| c.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
