use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ren_gateway_capabilities::{
    BurnProgress, CapabilityError, CapabilityResult, DestChain, MintReceipt,
};
use ren_gateway_primitives::{
    burn::BurnSession, deposit::SubmittingDeposit, subscription::Subscription, types::TxHash,
};

use crate::fixtures::mint_receipt;

/// A destination chain that answers every mint with the same scripted result.
#[derive(Debug)]
pub struct MockDestChain {
    mint_result: CapabilityResult<MintReceipt>,
    mint_calls: AtomicUsize,
    burn_calls: AtomicUsize,
}

impl MockDestChain {
    /// Creates a chain whose mints land as `0xdef`.
    pub fn new() -> Self {
        Self {
            mint_result: Ok(mint_receipt("0xdef")),
            mint_calls: AtomicUsize::new(0),
            burn_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every mint fail with `error`.
    pub fn with_mint_error(mut self, error: CapabilityError) -> Self {
        self.mint_result = Err(error);
        self
    }

    /// How often a mint was submitted.
    pub fn mint_calls(&self) -> usize {
        self.mint_calls.load(Ordering::SeqCst)
    }

    /// How often a burn was submitted directly on this chain.
    pub fn burn_calls(&self) -> usize {
        self.burn_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDestChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DestChain for MockDestChain {
    async fn submit_mint(&self, _deposit: &SubmittingDeposit) -> CapabilityResult<MintReceipt> {
        self.mint_calls.fetch_add(1, Ordering::SeqCst);
        self.mint_result.clone()
    }

    async fn submit_burn(
        &self,
        _session: &BurnSession,
        _resume: Option<&TxHash>,
    ) -> CapabilityResult<Subscription<BurnProgress>> {
        self.burn_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Subscription::from_items([]))
    }
}
