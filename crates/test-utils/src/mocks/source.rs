use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;
use ren_gateway_capabilities::{CapabilityError, CapabilityResult, SourceChain, SourceChainEvent};
use ren_gateway_primitives::{
    session::GatewaySession, subscription::Subscription, types::TxHash,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::fixtures::TEST_GATEWAY_ADDRESS;

/// A source chain whose deposits are pushed by the test.
///
/// The deposit watch stays open for as long as the mock lives, so a watcher only stops when it is
/// cancelled. Confirmation feeds are scripted per deposit and end after their last count.
#[derive(Debug)]
pub struct MockSourceChain {
    gateway_address: String,
    create_error: Option<CapabilityError>,
    target: Option<u64>,
    feed: UnboundedSender<SourceChainEvent>,
    watch: Mutex<Option<Subscription<SourceChainEvent>>>,
    confirmations: BTreeMap<TxHash, Vec<u64>>,
    create_calls: AtomicUsize,
    watch_calls: AtomicUsize,
    confirmation_watch_calls: AtomicUsize,
}

impl MockSourceChain {
    /// Creates a chain that hands out [`TEST_GATEWAY_ADDRESS`] and cannot report targets.
    pub fn new() -> Self {
        let (feed, watch) = Subscription::channel();

        Self {
            gateway_address: TEST_GATEWAY_ADDRESS.to_string(),
            create_error: None,
            target: None,
            feed,
            watch: Mutex::new(Some(watch)),
            confirmations: BTreeMap::new(),
            create_calls: AtomicUsize::new(0),
            watch_calls: AtomicUsize::new(0),
            confirmation_watch_calls: AtomicUsize::new(0),
        }
    }

    /// Makes address allocation fail with `error`.
    pub fn with_create_error(mut self, error: CapabilityError) -> Self {
        self.create_error = Some(error);
        self
    }

    /// Sets the confirmation target reported for every deposit.
    pub fn with_target(mut self, target: u64) -> Self {
        self.target = Some(target);
        self
    }

    /// Scripts the confirmation counts reported for a deposit, in delivery order.
    pub fn with_confirmations(mut self, source_tx_hash: &str, counts: Vec<u64>) -> Self {
        self.confirmations
            .insert(source_tx_hash.to_string(), counts);
        self
    }

    /// Pushes an event into the deposit watch.
    pub fn push(&self, event: SourceChainEvent) {
        // the receiver lives in `self.watch` or in the watcher that took it
        let _ = self.feed.send(event);
    }

    /// How often an address was requested.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// How often the deposit watch was opened.
    pub fn watch_calls(&self) -> usize {
        self.watch_calls.load(Ordering::SeqCst)
    }

    /// How often a confirmation watch was opened.
    pub fn confirmation_watch_calls(&self) -> usize {
        self.confirmation_watch_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSourceChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceChain for MockSourceChain {
    async fn create_gateway(&self, session: &GatewaySession) -> CapabilityResult<GatewaySession> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }

        Ok(GatewaySession {
            gateway_address: Some(self.gateway_address.clone()),
            ..session.clone()
        })
    }

    async fn watch_deposits(
        &self,
        _session: &GatewaySession,
    ) -> CapabilityResult<Subscription<SourceChainEvent>> {
        self.watch_calls.fetch_add(1, Ordering::SeqCst);

        self.watch.lock().take().ok_or_else(|| {
            CapabilityError::Unavailable("deposit watch is already open".to_string())
        })
    }

    async fn watch_confirmations(
        &self,
        source_tx_hash: &TxHash,
    ) -> CapabilityResult<Subscription<u64>> {
        self.confirmation_watch_calls.fetch_add(1, Ordering::SeqCst);

        let counts = self
            .confirmations
            .get(source_tx_hash)
            .cloned()
            .unwrap_or_default();
        Ok(Subscription::from_items(counts))
    }

    async fn confirmations(&self, source_tx_hash: &TxHash) -> CapabilityResult<u64> {
        Ok(self
            .confirmations
            .get(source_tx_hash)
            .and_then(|counts| counts.iter().max().copied())
            .unwrap_or_default())
    }

    async fn confirmation_target(&self, _source_tx_hash: &TxHash) -> CapabilityResult<Option<u64>> {
        Ok(self.target)
    }
}
