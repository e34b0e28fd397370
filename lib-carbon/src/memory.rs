//! In-memory collaborators
//!
//! Stand-ins for the wallet, market-data and storage services. Each carries a
//! [`SimulatedLatency`] so tests can inject delay or failure.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use lib_ledger::{ActorId, ContentAddress};
use lib_market::ReservePair;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::debug;

use crate::collaborators::{ContentStore, ReserveSource, Session};

/// Delay / failure injection point
#[derive(Debug, Default)]
pub struct SimulatedLatency {
    delay_ms: AtomicU64,
    failing: AtomicBool,
}

impl SimulatedLatency {
    pub fn new(delay: Duration) -> Self {
        let latency = Self::default();
        latency.set_delay(delay);
        latency
    }

    pub fn set_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::SeqCst))
    }

    /// Make every following call fail until cleared
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }

    /// Sleep for the configured delay, then fail if failure is injected
    pub async fn wait(&self, operation: &str) -> Result<()> {
        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.is_failing() {
            bail!("{} failed (injected)", operation);
        }
        Ok(())
    }
}

/// Fixed pool, adjustable from tests
#[derive(Debug)]
pub struct StaticReserveSource {
    pair: RwLock<ReservePair>,
    latency: SimulatedLatency,
}

impl StaticReserveSource {
    pub fn new(pair: ReservePair) -> Self {
        Self {
            pair: RwLock::new(pair),
            latency: SimulatedLatency::default(),
        }
    }

    pub fn latency(&self) -> &SimulatedLatency {
        &self.latency
    }

    pub async fn set_reserves(&self, pair: ReservePair) {
        *self.pair.write().await = pair;
    }
}

#[async_trait]
impl ReserveSource for StaticReserveSource {
    async fn reserves(&self) -> Result<ReservePair> {
        self.latency.wait("reserve lookup").await?;
        Ok(*self.pair.read().await)
    }

    async fn spot_price(&self) -> Result<Decimal> {
        self.latency.wait("spot price lookup").await?;
        let price = self.pair.read().await.spot_price()?;
        Ok(price)
    }
}

/// Content store keyed by the BLAKE3 digest of each blob
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    latency: SimulatedLatency,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latency(&self) -> &SimulatedLatency {
        &self.latency
    }

    /// Number of stored blobs
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<ContentAddress> {
        self.latency.wait("content upload").await?;
        let address = blake3::hash(&bytes).to_hex().to_string();
        debug!("Stored {} bytes at {}", bytes.len(), address);
        self.blobs.write().await.insert(address.clone(), bytes);
        Ok(ContentAddress::new(address))
    }

    async fn get(&self, address: &ContentAddress) -> Result<Option<Vec<u8>>> {
        self.latency.wait("content fetch").await?;
        Ok(self.blobs.read().await.get(address.as_str()).cloned())
    }
}

/// Wallet session that can be toggled on and off
#[derive(Debug)]
pub struct WalletSession {
    actor: ActorId,
    connected: AtomicBool,
}

impl WalletSession {
    /// Session for `actor`, initially disconnected
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            connected: AtomicBool::new(false),
        }
    }

    /// Session for `actor`, already connected
    pub fn connected(actor: ActorId) -> Self {
        let session = Self::new(actor);
        session.connect();
        session
    }

    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

impl Session for WalletSession {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn actor_id(&self) -> Option<ActorId> {
        if self.is_connected() && !self.actor.is_empty() {
            Some(self.actor.clone())
        } else {
            None
        }
    }
}
