//! Shared test fixtures for the engine's unit tests.

use super::validator::validate;
use crate::config::ConsensusParams;
use crate::crypto::{Address, Keypair};
use crate::operation::{namespace_commitment, sign_operation, NamespaceParams, Operation};
use crate::storage::pricing::{name_price, namespace_price};
use crate::storage::ChainState;

pub(crate) const NS: &str = "test";

pub(crate) fn test_namespace_params() -> NamespaceParams {
    NamespaceParams {
        lifetime: 52_595,
        coeff: 250,
        base: 4,
        buckets: [6, 5, 4, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        nonalpha_discount: 10,
        no_vowel_discount: 10,
    }
}

/// Five deterministic wallets.
pub(crate) struct Wallets {
    keys: Vec<Keypair>,
}

impl Wallets {
    pub(crate) fn new() -> Self {
        Self {
            keys: (1u8..=5).map(|i| Keypair::from_seed(&[i; 32])).collect(),
        }
    }

    pub(crate) fn key(&self, i: usize) -> &Keypair {
        &self.keys[i]
    }

    pub(crate) fn addr(&self, i: usize) -> Address {
        Address::from_public_key(&self.keys[i].public_key())
    }

    pub(crate) fn foo_price(&self) -> u64 {
        name_price("foo", &test_namespace_params(), &ConsensusParams::default())
    }
}

/// The three namespace operations that take `test` to READY: wallet 0
/// preorders and reveals with wallet 1 as revealer, wallet 1 readies.
pub(crate) fn namespace_ops(w: &Wallets) -> [crate::operation::SignedOperation; 3] {
    let params = ConsensusParams::default();
    let commitment = namespace_commitment(NS, &w.addr(0).payment_script(), &w.addr(1));
    [
        sign_operation(
            Operation::NamespacePreorder { commitment },
            namespace_price(NS, &params),
            w.key(0),
        ),
        sign_operation(
            Operation::NamespaceReveal {
                namespace_id: NS.into(),
                reveal_address: w.addr(1),
                params: test_namespace_params(),
            },
            0,
            w.key(0),
        ),
        sign_operation(
            Operation::NamespaceReady {
                namespace_id: NS.into(),
            },
            0,
            w.key(1),
        ),
    ]
}

/// State with namespace `test` made ready across heights 1..=3.
pub(crate) fn ready_state(w: &Wallets) -> ChainState {
    let params = ConsensusParams::default();
    let mut state = ChainState::default();
    for (height, op) in (1u64..).zip(namespace_ops(w).iter()) {
        match validate(&state, op, height, &params) {
            Ok(delta) => delta.apply(&mut state),
            Err(e) => panic!("fixture op at height {height} rejected: {e}"),
        }
    }
    state
}
