//! Property-based tests for the Gateway State Machine.

use proptest::prelude::*;

use crate::{
    gateway::{
        events::GatewayEvent,
        machine::GatewaySM,
        tests::{arb_machine, arb_terminal_machine},
    },
    prop_deterministic, prop_no_silent_acceptance, prop_terminal_states_reject,
};

prop_deterministic!(
    GatewaySM,
    (),
    arb_machine(),
    any::<GatewayEvent>()
);

prop_terminal_states_reject!(
    GatewaySM,
    (),
    arb_terminal_machine(),
    any::<GatewayEvent>()
);

prop_no_silent_acceptance!(
    GatewaySM,
    (),
    arb_machine(),
    any::<GatewayEvent>()
);
