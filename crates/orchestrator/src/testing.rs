//! Shared test helpers for the orchestrator crate.
//!
//! Mock capabilities and session fixtures come from [`ren_gateway_test_utils`]. This module wires
//! them into session contexts and adds helpers to wait on a running session.

use std::{sync::Arc, time::Duration};

use ren_gateway_capabilities::{DestChain, SourceChain};
use ren_gateway_params::SessionParams;
use ren_gateway_primitives::{burn::BurnSession, session::GatewaySession};
use ren_gateway_test_utils::mocks::{MockDestChain, MockProtocol, MockSourceChain};
use tokio::{sync::watch, task::JoinHandle, time::timeout};

use crate::{
    context::{BurnContext, MintContext},
    errors::DriverError,
};

/// How long a test waits for a session to reach an expected state.
pub(crate) const WAIT: Duration = Duration::from_secs(5);

/// Parameters with short timers so that sessions settle quickly.
pub(crate) const fn test_params() -> SessionParams {
    SessionParams {
        auto_submit_delay_ms: 10,
        shutdown_timeout_ms: 500,
        default_confirmation_target: 2,
    }
}

/// Builds a mint context that hands out the given mocks.
pub(crate) fn mint_context(
    session: GatewaySession,
    source: Arc<MockSourceChain>,
    dest: Arc<MockDestChain>,
    protocol: Arc<MockProtocol>,
) -> MintContext {
    MintContext {
        session,
        protocol,
        source: Arc::new(move |_: &GatewaySession| source.clone() as Arc<dyn SourceChain>),
        dest: Arc::new(move |_: &GatewaySession| dest.clone() as Arc<dyn DestChain>),
    }
}

/// Builds a burn context that hands out the given protocol and default chain mocks.
pub(crate) fn burn_context(
    session: BurnSession,
    protocol: Arc<MockProtocol>,
    auto_submit: bool,
) -> BurnContext {
    BurnContext {
        session,
        protocol,
        from: Arc::new(|_: &BurnSession| Arc::new(MockDestChain::new()) as Arc<dyn DestChain>),
        to: Arc::new(|_: &BurnSession| Arc::new(MockSourceChain::new()) as Arc<dyn SourceChain>),
        auto_submit,
    }
}

/// Waits until the published snapshot satisfies `done` and returns it.
pub(crate) async fn wait_until<M: Clone>(
    snapshots: &mut watch::Receiver<M>,
    what: &str,
    done: impl FnMut(&M) -> bool,
) -> M {
    let snapshot = timeout(WAIT, snapshots.wait_for(done))
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
        .unwrap_or_else(|_| panic!("session stopped before {what}"));

    M::clone(&snapshot)
}

/// Waits for a session task to stop and returns its outcome.
pub(crate) async fn join<M>(session: JoinHandle<Result<M, DriverError>>) -> Result<M, DriverError> {
    timeout(WAIT, session)
        .await
        .expect("session must stop in time")
        .expect("session must not panic")
}
