//! Shared harness for the integration tests: five deterministic wallets
//! and a processor that mines one block per call.

#![allow(dead_code)]

use bns_protocol::config::ConsensusParams;
use bns_protocol::crypto::{Address, Keypair};
use bns_protocol::engine::{BlockProcessor, BlockReceipt, NamingQuery, OperationOutcome};
use bns_protocol::logging::{init_logging, LogFormat};
use bns_protocol::operation::{
    name_commitment, namespace_commitment, sign_operation, NamespaceParams, Operation,
    SignedOperation,
};
use bns_protocol::storage::{name_price, namespace_price, Block};

pub const NS: &str = "test";

pub fn scenario_params() -> NamespaceParams {
    NamespaceParams {
        lifetime: 52_595,
        coeff: 250,
        base: 4,
        buckets: [6, 5, 4, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        nonalpha_discount: 10,
        no_vowel_discount: 10,
    }
}

pub struct Harness {
    pub processor: BlockProcessor,
    pub namespace_params: NamespaceParams,
    wallets: Vec<Keypair>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(ConsensusParams::default(), scenario_params())
    }

    pub fn with(consensus: ConsensusParams, namespace_params: NamespaceParams) -> Self {
        let _ = init_logging("warn", LogFormat::Pretty);
        Self {
            processor: BlockProcessor::new(consensus).expect("valid params"),
            namespace_params,
            wallets: (1u8..=5).map(|i| Keypair::from_seed(&[i; 32])).collect(),
        }
    }

    pub fn key(&self, i: usize) -> &Keypair {
        &self.wallets[i]
    }

    pub fn addr(&self, i: usize) -> Address {
        Address::from_public_key(&self.wallets[i].public_key())
    }

    pub fn height(&self) -> u64 {
        self.processor.block_height()
    }

    pub fn price(&self, label: &str) -> u64 {
        name_price(label, &self.namespace_params, self.processor.params())
    }

    /// The block that would extend the committed tip.
    pub fn next_block(&self, ops: Vec<SignedOperation>) -> Block {
        let tip = self.processor.snapshot();
        Block::with_parent(tip.height() + 1, tip.last_block_hash(), ops)
    }

    pub fn mine(&self, ops: Vec<SignedOperation>) -> BlockReceipt {
        let block = self.next_block(ops);
        self.processor.process_block(&block).expect("block accepted")
    }

    /// Mine a block holding exactly `op` and return its outcome.
    pub fn mine_one(&self, op: SignedOperation) -> OperationOutcome {
        let mut receipt = self.mine(vec![op]);
        receipt.outcomes.remove(0)
    }

    pub fn mine_empty(&self, blocks: u64) {
        for _ in 0..blocks {
            self.mine(vec![]);
        }
    }

    // -- namespace ----------------------------------------------------------

    pub fn namespace_preorder_op(&self, payer: usize, revealer: usize) -> SignedOperation {
        let commitment =
            namespace_commitment(NS, &self.addr(payer).payment_script(), &self.addr(revealer));
        sign_operation(
            Operation::NamespacePreorder { commitment },
            namespace_price(NS, self.processor.params()),
            self.key(payer),
        )
    }

    pub fn namespace_reveal_op(&self, payer: usize, revealer: usize) -> SignedOperation {
        sign_operation(
            Operation::NamespaceReveal {
                namespace_id: NS.into(),
                reveal_address: self.addr(revealer),
                params: self.namespace_params.clone(),
            },
            0,
            self.key(payer),
        )
    }

    pub fn namespace_ready_op(&self, signer: usize) -> SignedOperation {
        sign_operation(
            Operation::NamespaceReady {
                namespace_id: NS.into(),
            },
            0,
            self.key(signer),
        )
    }

    /// Preorder, reveal and ready `test` in three consecutive blocks:
    /// wallet 0 pays, wallet 1 is the revealer.
    pub fn ready_namespace(&self) {
        for op in [
            self.namespace_preorder_op(0, 1),
            self.namespace_reveal_op(0, 1),
            self.namespace_ready_op(1),
        ] {
            let outcome = self.mine_one(op);
            assert!(outcome.accepted(), "namespace setup failed: {:?}", outcome.result);
        }
    }

    // -- names --------------------------------------------------------------

    pub fn name_preorder_op(&self, name: &str, payer: usize, recipient: usize) -> SignedOperation {
        let label = name.split('.').next().unwrap_or(name);
        let commitment =
            name_commitment(name, &self.addr(payer).payment_script(), &self.addr(recipient));
        sign_operation(
            Operation::NamePreorder {
                namespace_id: NS.into(),
                commitment,
            },
            self.price(label),
            self.key(payer),
        )
    }

    pub fn register_op(&self, name: &str, payer: usize, recipient: usize) -> SignedOperation {
        sign_operation(
            Operation::NameRegister {
                name: name.into(),
                register_address: self.addr(recipient),
            },
            0,
            self.key(payer),
        )
    }

    pub fn update_op(&self, name: &str, signer: usize, value_hash: [u8; 20]) -> SignedOperation {
        sign_operation(
            Operation::NameUpdate {
                name: name.into(),
                value_hash,
            },
            0,
            self.key(signer),
        )
    }

    pub fn renew_op(&self, name: &str, signer: usize) -> SignedOperation {
        let label = name.split('.').next().unwrap_or(name);
        sign_operation(
            Operation::NameRenew { name: name.into() },
            self.price(label),
            self.key(signer),
        )
    }

    pub fn transfer_op(
        &self,
        name: &str,
        signer: usize,
        recipient: usize,
        keep_data: bool,
    ) -> SignedOperation {
        sign_operation(
            Operation::NameTransfer {
                name: name.into(),
                recipient: self.addr(recipient),
                keep_data,
            },
            0,
            self.key(signer),
        )
    }

    pub fn revoke_op(&self, name: &str, signer: usize) -> SignedOperation {
        sign_operation(Operation::NameRevoke { name: name.into() }, 0, self.key(signer))
    }

    /// Preorder then register `name` in two blocks.
    pub fn register_name(&self, name: &str, payer: usize, recipient: usize) {
        let pre = self.mine_one(self.name_preorder_op(name, payer, recipient));
        assert!(pre.accepted(), "preorder failed: {:?}", pre.result);
        let reg = self.mine_one(self.register_op(name, payer, recipient));
        assert!(reg.accepted(), "register failed: {:?}", reg.result);
    }
}
