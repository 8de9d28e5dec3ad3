//! # Block Processor
//!
//! The single writer of chain state. Takes finalized blocks in order, runs
//! every operation through the validator, and commits the result as a new
//! immutable snapshot.
//!
//! ## Pipeline Stages
//!
//! ```text
//! 1. CHECK: block integrity, height = tip + 1, parent = tip hash
//! 2. APPLY: validate each op against a private working copy; apply accepted deltas
//! 3. DIGEST: state root and consensus hash of the working copy
//! 4. COMMIT: swap the working copy in as the committed snapshot
//! ```
//!
//! A block that fails stage 1 is refused whole and nothing changes. A
//! rejected operation in stage 2 only costs that operation; earlier and
//! later operations in the block are unaffected.
//!
//! ## Thread Safety
//!
//! Writers are serialized by a mutex. The committed state is an
//! `Arc<ChainState>` behind an `RwLock`, replaced in one write at commit,
//! so readers holding an older `Arc` keep a consistent view and never see a
//! half-applied block.
//!
//! The working copy is a full clone of the committed tables, so each block
//! costs time proportional to the whole state, not just to its operations.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::delta::StateDelta;
use super::validator::validate;
use crate::config::{ConfigError, ConsensusParams};
use crate::crypto::hash::{blake3_hash_multi, merkle_root};
use crate::error::{BlockError, ErrorKind, RejectReason};
use crate::operation::OpKind;
use crate::storage::{Block, ChainState, ConsensusHash};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessorPhase {
    /// No block applied since construction.
    AwaitingBlock,
    /// A block is being applied to the working copy.
    Processing,
    /// The last block was committed; ready for the next.
    Committed,
}

impl fmt::Display for ProcessorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingBlock => write!(f, "AWAITING_BLOCK"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Committed => write!(f, "COMMITTED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to one operation in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// Position in the block.
    pub index: usize,
    /// Hex double-SHA-256 of the operation's signable bytes.
    pub op_id: String,
    pub kind: OpKind,
    pub result: Result<StateDelta, RejectReason>,
}

impl OperationOutcome {
    pub fn accepted(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.result.as_ref().err().map(RejectReason::kind)
    }
}

/// Result of committing one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockReceipt {
    pub height: u64,
    pub block_hash: [u8; 32],
    /// One entry per operation, in block order.
    pub outcomes: Vec<OperationOutcome>,
    pub state_root: [u8; 32],
    pub consensus_hash: ConsensusHash,
}

impl BlockReceipt {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.accepted()).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }
}

// ---------------------------------------------------------------------------
// BlockProcessor
// ---------------------------------------------------------------------------

pub struct BlockProcessor {
    params: ConsensusParams,
    committed: RwLock<Arc<ChainState>>,
    phase: RwLock<ProcessorPhase>,
    /// Held for the whole of `process_block`.
    writer: Mutex<()>,
}

impl BlockProcessor {
    /// A processor at genesis.
    pub fn new(params: ConsensusParams) -> Result<Self, ConfigError> {
        let genesis = Block::genesis();
        Self::from_state(params, ChainState::new(genesis.header.hash))
    }

    /// A processor resuming from a previously committed state.
    pub fn from_state(params: ConsensusParams, state: ChainState) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            committed: RwLock::new(Arc::new(state)),
            phase: RwLock::new(ProcessorPhase::AwaitingBlock),
            writer: Mutex::new(()),
        })
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    pub fn phase(&self) -> ProcessorPhase {
        *self.phase.read()
    }

    /// The committed state. Cheap; the returned `Arc` never changes.
    pub fn snapshot(&self) -> Arc<ChainState> {
        Arc::clone(&self.committed.read())
    }

    /// Apply `block` and commit the resulting state.
    ///
    /// # Errors
    ///
    /// [`BlockError`] if the block is corrupt or does not extend the
    /// committed tip. Committed state is untouched in that case.
    pub fn process_block(&self, block: &Block) -> Result<BlockReceipt, BlockError> {
        let _writer = self.writer.lock();
        let base = self.snapshot();

        if let Err(e) = check_linkage(&base, block) {
            warn!(
                height = block.header.height,
                block_hash = %block.hash_hex(),
                error = %e,
                "block refused"
            );
            return Err(e);
        }

        *self.phase.write() = ProcessorPhase::Processing;
        let height = block.header.height;
        let mut working = ChainState::clone(&base);
        let mut outcomes = Vec::with_capacity(block.operations.len());
        let mut accepted_ids = Vec::new();

        for (index, op) in block.operations.iter().enumerate() {
            let op_id = op.id_bytes();
            let result = validate(&working, op, height, &self.params);

            match &result {
                Ok(delta) => {
                    delta.apply(&mut working);
                    accepted_ids.push(op_id);
                }
                Err(reason) => {
                    debug!(
                        height,
                        index,
                        kind = %op.kind(),
                        target = %op.operation.target(),
                        error_kind = %reason.kind(),
                        error = %reason,
                        "operation rejected"
                    );
                }
            }

            outcomes.push(OperationOutcome {
                index,
                op_id: hex::encode(op_id),
                kind: op.kind(),
                result,
            });
        }

        let state_root = working.root_hash();
        let consensus_hash = compute_consensus_hash(&working, height, &accepted_ids, &state_root);
        working.advance(height, block.header.hash, consensus_hash);

        *self.committed.write() = Arc::new(working);
        *self.phase.write() = ProcessorPhase::Committed;

        let receipt = BlockReceipt {
            height,
            block_hash: block.header.hash,
            outcomes,
            state_root,
            consensus_hash,
        };

        info!(
            height,
            block_hash = %block.hash_hex(),
            ops = block.op_count(),
            accepted = receipt.accepted_count(),
            rejected = receipt.rejected_count(),
            consensus_hash = %hex::encode(consensus_hash),
            "block committed"
        );

        Ok(receipt)
    }
}

fn check_linkage(tip: &ChainState, block: &Block) -> Result<(), BlockError> {
    block.verify()?;

    let expected = tip.height() + 1;
    if block.header.height != expected {
        return Err(BlockError::OutOfOrder {
            expected,
            got: block.header.height,
        });
    }
    if block.header.parent_hash != tip.last_block_hash() {
        return Err(BlockError::ParentMismatch {
            height: block.header.height,
            expected: hex::encode(tip.last_block_hash()),
            got: block.header.parent_hash_hex(),
        });
    }
    Ok(())
}

/// `BLAKE3(accepted_ops_root || state_root || CH(h-1) || CH(h-2) || CH(h-4) || ...)`
/// truncated to 16 bytes. Heights with no recorded hash are skipped.
fn compute_consensus_hash(
    state: &ChainState,
    height: u64,
    accepted_ids: &[[u8; 32]],
    state_root: &[u8; 32],
) -> ConsensusHash {
    let ops_root = merkle_root(accepted_ids);

    let mut prior: Vec<ConsensusHash> = Vec::new();
    let mut distance: u64 = 1;
    while distance < height {
        if let Some(ch) = state.consensus_hash_at(height - distance) {
            prior.push(ch);
        }
        distance = distance.saturating_mul(2);
    }

    let mut parts: Vec<&[u8]> = vec![ops_root.as_slice(), state_root.as_slice()];
    parts.extend(prior.iter().map(|ch| ch.as_slice()));

    let full = blake3_hash_multi(&parts);
    let mut out = [0u8; 16];
    out.copy_from_slice(&full[..16]);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{namespace_ops, Wallets};
    use crate::operation::SignedOperation;

    fn processor() -> BlockProcessor {
        BlockProcessor::new(ConsensusParams::default()).unwrap()
    }

    fn next_block(p: &BlockProcessor, ops: Vec<SignedOperation>) -> Block {
        let tip = p.snapshot();
        Block::with_parent(tip.height() + 1, tip.last_block_hash(), ops)
    }

    #[test]
    fn starts_awaiting_at_genesis() {
        let p = processor();
        assert_eq!(p.phase(), ProcessorPhase::AwaitingBlock);
        assert_eq!(p.snapshot().height(), 0);
        assert_eq!(p.snapshot().last_block_hash(), Block::genesis().header.hash);
    }

    #[test]
    fn commits_namespace_lifecycle() {
        let w = Wallets::new();
        let p = processor();
        for op in namespace_ops(&w) {
            let receipt = p.process_block(&next_block(&p, vec![op])).unwrap();
            assert_eq!(receipt.accepted_count(), 1, "{:?}", receipt.outcomes);
        }
        assert_eq!(p.phase(), ProcessorPhase::Committed);
        assert_eq!(p.snapshot().height(), 3);
        assert!(p.snapshot().namespace("test").unwrap().is_ready());
    }

    #[test]
    fn same_block_ops_see_earlier_effects() {
        let w = Wallets::new();
        let p = processor();
        let receipt = p
            .process_block(&next_block(&p, namespace_ops(&w).to_vec()))
            .unwrap();
        assert_eq!(receipt.accepted_count(), 3);
    }

    #[test]
    fn rejection_does_not_undo_earlier_ops() {
        let w = Wallets::new();
        let p = processor();
        let [preorder, reveal, _] = namespace_ops(&w);
        let receipt = p
            .process_block(&next_block(&p, vec![preorder, reveal.clone(), reveal]))
            .unwrap();
        assert!(receipt.outcomes[0].accepted());
        assert!(receipt.outcomes[1].accepted());
        assert_eq!(
            receipt.outcomes[2].error_kind(),
            Some(ErrorKind::InvalidStateTransition)
        );
        assert!(p.snapshot().namespace("test").is_some());
    }

    #[test]
    fn rejected_reveal_leaves_preorder_unconsumed() {
        let w = Wallets::new();
        let p = processor();
        let [preorder, reveal, _] = namespace_ops(&w);
        let underpaid = crate::operation::sign_operation(
            preorder.operation.clone(),
            preorder.fee - 1,
            w.key(0),
        );
        let receipt = p
            .process_block(&next_block(&p, vec![underpaid, reveal]))
            .unwrap();
        assert!(receipt.outcomes[0].accepted());
        assert_eq!(receipt.outcomes[1].error_kind(), Some(ErrorKind::InsufficientFee));

        let commitment = crate::operation::namespace_commitment(
            "test",
            &w.addr(0).payment_script(),
            &w.addr(1),
        );
        let state = p.snapshot();
        assert!(!state.namespace_preorder(&commitment).unwrap().consumed);
        assert!(state.namespace("test").is_none());
    }

    #[test]
    fn out_of_order_block_refused() {
        let p = processor();
        let tip = p.snapshot();
        let block = Block::with_parent(2, tip.last_block_hash(), vec![]);
        assert_eq!(
            p.process_block(&block),
            Err(BlockError::OutOfOrder { expected: 1, got: 2 })
        );
        assert_eq!(p.snapshot().height(), 0);
        assert_eq!(p.phase(), ProcessorPhase::AwaitingBlock);
    }

    #[test]
    fn wrong_parent_refused() {
        let p = processor();
        let block = Block::with_parent(1, [7u8; 32], vec![]);
        assert!(matches!(
            p.process_block(&block),
            Err(BlockError::ParentMismatch { height: 1, .. })
        ));
    }

    #[test]
    fn corrupt_block_refused() {
        let p = processor();
        let mut block = next_block(&p, vec![]);
        block.header.ops_root[0] ^= 1;
        assert!(matches!(p.process_block(&block), Err(BlockError::Integrity(_))));
    }

    #[test]
    fn block_with_repeated_last_operation_refused() {
        let w = Wallets::new();
        let p = processor();
        let mut block = next_block(&p, namespace_ops(&w).to_vec());
        let last = block.operations[2].clone();
        block.operations.push(last);
        assert!(matches!(p.process_block(&block), Err(BlockError::Integrity(_))));
        assert_eq!(p.snapshot().height(), 0);
        assert!(p.snapshot().namespace("test").is_none());
    }

    #[test]
    fn outcome_ids_match_operation_ids() {
        let w = Wallets::new();
        let p = processor();
        let ops = namespace_ops(&w);
        let receipt = p.process_block(&next_block(&p, ops.to_vec())).unwrap();
        for (outcome, op) in receipt.outcomes.iter().zip(&ops) {
            assert_eq!(outcome.op_id, op.id());
        }
    }

    #[test]
    fn empty_blocks_advance_consensus_hash_chain() {
        let p = processor();
        let r1 = p.process_block(&next_block(&p, vec![])).unwrap();
        let r2 = p.process_block(&next_block(&p, vec![])).unwrap();
        assert_ne!(r1.consensus_hash, r2.consensus_hash);
        assert_eq!(p.snapshot().consensus_hash_at(1), Some(r1.consensus_hash));
        assert_eq!(p.snapshot().consensus_hash_at(2), Some(r2.consensus_hash));
    }

    #[test]
    fn old_snapshot_unchanged_by_commit() {
        let w = Wallets::new();
        let p = processor();
        let before = p.snapshot();
        p.process_block(&next_block(&p, namespace_ops(&w).to_vec()))
            .unwrap();
        assert!(before.namespace("test").is_none());
        assert!(p.snapshot().namespace("test").is_some());
    }

    #[test]
    fn invalid_params_rejected_at_construction() {
        let params = ConsensusParams {
            name_cost_unit: 0,
            ..ConsensusParams::default()
        };
        assert!(BlockProcessor::new(params).is_err());
    }

    #[test]
    fn receipt_serializes() {
        let w = Wallets::new();
        let p = processor();
        let receipt = p
            .process_block(&next_block(&p, namespace_ops(&w).to_vec()))
            .unwrap();
        let json = serde_json::to_string(&receipt).unwrap();
        let back: BlockReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
    }
}
