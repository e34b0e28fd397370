//! Retirement service
//!
//! Burns tokens and issues a certificate stored in the content store.
//! The upload happens before the debit, so a storage failure or timeout
//! leaves the ledger untouched. Retirement cannot be undone.

use std::sync::Arc;

use lib_ledger::{RetirementCertificate, TransactionDetails, TransactionRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collaborators::{call_with_deadline, ContentStore};
use crate::context::{require_positive, ServiceContext};
use crate::errors::{CarbonError, CarbonResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetirementOutcome {
    pub record: TransactionRecord,
    pub certificate: RetirementCertificate,
}

#[derive(Clone)]
pub struct RetirementService {
    ctx: ServiceContext,
    store: Arc<dyn ContentStore>,
}

impl RetirementService {
    pub fn new(ctx: ServiceContext, store: Arc<dyn ContentStore>) -> Self {
        Self { ctx, store }
    }

    /// Retire `amount` liquid tokens with an optional reason
    pub async fn retire(
        &self,
        amount: Decimal,
        reason: Option<String>,
    ) -> CarbonResult<RetirementOutcome> {
        let owner = self.ctx.require_actor()?;
        require_positive(amount, "retirement amount")?;

        let available = self.ctx.ledger.read().await.balance().liquid;
        if amount > available {
            debug!("Rejected retirement of {}: only {} liquid", amount, available);
            return Err(CarbonError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let draft = RetirementCertificate::draft(amount, owner, reason)?;
        let payload = draft.to_bytes()?;
        let address = call_with_deadline(
            "content store",
            self.ctx.config.collaborator_timeout(),
            self.store.put(payload),
            CarbonError::StorageUnavailable,
        )
        .await?;
        let certificate = draft.issue(address)?;

        let record = {
            let mut ledger = self.ctx.ledger.write().await;
            // Balance may have moved while the upload was in flight
            if let Err(e) = ledger.store_mut().debit_liquid(amount) {
                warn!(
                    "Retirement {} aborted after upload, {} left orphaned: {}",
                    certificate.id, certificate.content_address, e
                );
                return Err(e.into());
            }
            ledger.certificates_mut().insert(certificate.clone());
            ledger.recorder_mut().append(TransactionDetails::Retire {
                amount,
                certificate_id: certificate.id.clone(),
            })
        };

        info!(
            "Retired {} tokens, certificate {} at {}",
            amount, certificate.id, certificate.content_address
        );
        Ok(RetirementOutcome {
            record,
            certificate,
        })
    }
}
