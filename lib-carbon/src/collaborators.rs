//! Collaborator contracts
//!
//! Everything the services consume from outside: pool reserves, the
//! content-addressed store and the wallet session.
//!
//! ## Example
//! ```rust,ignore
//! use lib_carbon::collaborators::ContentStore;
//!
//! async fn archive<S: ContentStore>(store: &S, payload: Vec<u8>) -> anyhow::Result<()> {
//!     let address = store.put(payload.clone()).await?;
//!     assert_eq!(store.get(&address).await?, Some(payload));
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use lib_ledger::{ActorId, ContentAddress};
use lib_market::ReservePair;
use rust_decimal::Decimal;
use tracing::warn;

use crate::errors::{CarbonError, CarbonResult};

/// Market-data source for the pool backing swaps
///
/// Authoritative and read-only per call.
#[async_trait]
pub trait ReserveSource: Send + Sync {
    async fn reserves(&self) -> Result<ReservePair>;

    async fn spot_price(&self) -> Result<Decimal>;
}

/// Content-addressed blob store used for retirement certificates
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store `bytes`, returning the address they can be fetched under
    async fn put(&self, bytes: Vec<u8>) -> Result<ContentAddress>;

    async fn get(&self, address: &ContentAddress) -> Result<Option<Vec<u8>>>;
}

/// Wallet / session state supplied by the UI
pub trait Session: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Opaque identifier of the connected actor
    fn actor_id(&self) -> Option<ActorId>;
}

/// Await a collaborator call under `deadline`
///
/// A collaborator error is mapped through `on_error`; an elapsed deadline
/// becomes [`CarbonError::CollaboratorTimeout`]. Either way the caller has
/// not mutated anything yet.
pub(crate) async fn call_with_deadline<T, F>(
    collaborator: &'static str,
    deadline: Duration,
    call: F,
    on_error: impl FnOnce(String) -> CarbonError,
) -> CarbonResult<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!("{} call failed: {:#}", collaborator, e);
            Err(on_error(format!("{:#}", e)))
        }
        Err(_) => {
            let timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
            warn!("{} did not respond within {}ms", collaborator, timeout_ms);
            Err(CarbonError::CollaboratorTimeout {
                collaborator,
                timeout_ms,
            })
        }
    }
}
