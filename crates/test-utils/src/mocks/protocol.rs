use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;
use ren_gateway_capabilities::{
    BurnAndRelease, BurnAndReleaseParams, BurnProgress, CapabilityError, CapabilityResult,
    DepositSignature, ReleaseProgress, RenProtocol,
};
use ren_gateway_primitives::{
    deposit::DepositTransaction,
    session::GatewaySession,
    subscription::Subscription,
    types::{Network, TxHash},
};

use crate::fixtures::deposit_signature;

/// A protocol deployment with a scripted signature and a single scripted burn-and-release.
#[derive(Debug)]
pub struct MockProtocol {
    network: Network,
    signature: CapabilityResult<DepositSignature>,
    open_error: Option<CapabilityError>,
    burn: MockBurnAndRelease,
    sign_calls: AtomicUsize,
    opened_with: Mutex<Vec<Option<TxHash>>>,
}

impl MockProtocol {
    /// Creates a testnet deployment that signs every deposit with
    /// [`deposit_signature`](crate::fixtures::deposit_signature).
    pub fn new() -> Self {
        Self {
            network: Network::Testnet,
            signature: Ok(deposit_signature()),
            open_error: None,
            burn: MockBurnAndRelease::new(),
            sign_calls: AtomicUsize::new(0),
            opened_with: Mutex::new(Vec::new()),
        }
    }

    /// Makes every signature request fail with `error`.
    pub fn with_sign_error(mut self, error: CapabilityError) -> Self {
        self.signature = Err(error);
        self
    }

    /// Makes opening a burn-and-release fail with `error`.
    pub fn with_open_error(mut self, error: CapabilityError) -> Self {
        self.open_error = Some(error);
        self
    }

    /// Replaces the burn-and-release handed out by [`RenProtocol::burn_and_release`].
    pub fn with_burn(mut self, burn: MockBurnAndRelease) -> Self {
        self.burn = burn;
        self
    }

    /// The burn-and-release handed out by this deployment. Shares its counters.
    pub fn burn(&self) -> &MockBurnAndRelease {
        &self.burn
    }

    /// How often a deposit signature was requested.
    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    /// The burn hash each burn-and-release was opened with, in call order.
    pub fn opened_with(&self) -> Vec<Option<TxHash>> {
        self.opened_with.lock().clone()
    }
}

impl Default for MockProtocol {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenProtocol for MockProtocol {
    fn network(&self) -> Network {
        self.network
    }

    async fn sign_deposit(
        &self,
        _session: &GatewaySession,
        _deposit: &DepositTransaction,
    ) -> CapabilityResult<DepositSignature> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        self.signature.clone()
    }

    async fn burn_and_release(
        &self,
        params: BurnAndReleaseParams,
    ) -> CapabilityResult<Box<dyn BurnAndRelease>> {
        self.opened_with.lock().push(params.transaction);

        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }

        Ok(Box::new(self.burn.clone()))
    }
}

/// A burn-and-release with scripted progress.
///
/// Clones share their counters and the queue of release scripts.
#[derive(Debug, Clone)]
pub struct MockBurnAndRelease {
    target: u64,
    burn_progress: Vec<BurnProgress>,
    release_scripts: Arc<Mutex<VecDeque<Vec<ReleaseProgress>>>>,
    burn_calls: Arc<AtomicUsize>,
    release_calls: Arc<AtomicUsize>,
    cancel_calls: Arc<AtomicUsize>,
}

impl MockBurnAndRelease {
    /// Creates a burn that needs two confirmations and reports no progress.
    pub fn new() -> Self {
        Self {
            target: 2,
            burn_progress: Vec::new(),
            release_scripts: Arc::new(Mutex::new(VecDeque::new())),
            burn_calls: Arc::new(AtomicUsize::new(0)),
            release_calls: Arc::new(AtomicUsize::new(0)),
            cancel_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scripts the progress reported by every call to [`BurnAndRelease::burn`].
    pub fn with_burn_progress(mut self, progress: Vec<BurnProgress>) -> Self {
        self.burn_progress = progress;
        self
    }

    /// Queues the progress reported by the next unscripted call to [`BurnAndRelease::release`].
    ///
    /// Calls beyond the queued scripts report nothing.
    pub fn with_release_progress(self, progress: Vec<ReleaseProgress>) -> Self {
        self.release_scripts.lock().push_back(progress);
        self
    }

    /// How often the burn was submitted or resumed.
    pub fn burn_calls(&self) -> usize {
        self.burn_calls.load(Ordering::SeqCst)
    }

    /// How often the release was requested.
    pub fn release_calls(&self) -> usize {
        self.release_calls.load(Ordering::SeqCst)
    }

    /// How often the listeners were detached.
    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockBurnAndRelease {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BurnAndRelease for MockBurnAndRelease {
    async fn confirmation_target(&self) -> CapabilityResult<u64> {
        Ok(self.target)
    }

    async fn burn(&self) -> CapabilityResult<Subscription<BurnProgress>> {
        self.burn_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Subscription::from_items(self.burn_progress.clone()))
    }

    async fn release(&self) -> CapabilityResult<Subscription<ReleaseProgress>> {
        self.release_calls.fetch_add(1, Ordering::SeqCst);

        let script = self.release_scripts.lock().pop_front().unwrap_or_default();
        Ok(Subscription::from_items(script))
    }

    fn cancel(&self) {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
    }
}
