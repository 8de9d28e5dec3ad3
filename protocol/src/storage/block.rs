//! # Block Structure
//!
//! A block is the unit the engine applies atomically: an ordered list of
//! signed naming operations plus a header linking it to its parent.
//!
//! ## Block Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  BlockHeader                                │
//! │  ├── height: u64                            │
//! │  ├── hash: [u8; 32]       (BLAKE3 of header)│
//! │  ├── parent_hash: [u8; 32]                  │
//! │  └── ops_root: [u8; 32]   (Merkle root)     │
//! ├─────────────────────────────────────────────┤
//! │  operations: Vec<SignedOperation>           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The engine does not produce or sign blocks; it only checks that what it
//! receives is internally consistent and extends the committed tip.

use serde::{Deserialize, Serialize};

use crate::crypto::hash::{blake3_hash, blake3_hash_multi, domain_separated_hash, merkle_root};
use crate::error::BlockError;
use crate::operation::SignedOperation;

/// Mixed into the genesis hash so it differs from any real header.
pub const GENESIS_MESSAGE: &[u8] = b"bns genesis";

const OPS_LEAF_CONTEXT: &str = "bns op leaf v1";

// ---------------------------------------------------------------------------
// BlockHeader
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block height (genesis = 0).
    pub height: u64,
    /// BLAKE3 over `height || parent_hash || ops_root`.
    pub hash: [u8; 32],
    /// All zeros for genesis.
    pub parent_hash: [u8; 32],
    /// Merkle root of the operations in this block.
    pub ops_root: [u8; 32],
}

impl BlockHeader {
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn parent_hash_hex(&self) -> String {
        hex::encode(self.parent_hash)
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    /// Applied strictly in this order.
    pub operations: Vec<SignedOperation>,
}

impl Block {
    /// The genesis block: height 0, no parent, no operations.
    pub fn genesis() -> Self {
        let ops_root = blake3_hash(GENESIS_MESSAGE);
        let hash = compute_header_hash(0, &[0u8; 32], &ops_root);
        Block {
            header: BlockHeader {
                height: 0,
                hash,
                parent_hash: [0u8; 32],
                ops_root,
            },
            operations: Vec::new(),
        }
    }

    /// Build the block that extends `parent` with `operations`.
    pub fn new(parent: &Block, operations: Vec<SignedOperation>) -> Self {
        Self::with_parent(parent.header.height + 1, parent.header.hash, operations)
    }

    /// Build a block at `height` on top of `parent_hash`.
    pub fn with_parent(height: u64, parent_hash: [u8; 32], operations: Vec<SignedOperation>) -> Self {
        let ops_root = compute_ops_root(&operations);
        let hash = compute_header_hash(height, &parent_hash, &ops_root);
        Block {
            header: BlockHeader {
                height,
                hash,
                parent_hash,
                ops_root,
            },
            operations,
        }
    }

    /// Recompute the header hash from the header fields.
    pub fn compute_hash(&self) -> [u8; 32] {
        compute_header_hash(self.header.height, &self.header.parent_hash, &self.header.ops_root)
    }

    /// Check that the stored hash and operation root match the contents.
    ///
    /// Linkage to the committed tip is the processor's job, not this one's.
    pub fn verify(&self) -> Result<(), BlockError> {
        let expected_hash = self.compute_hash();
        if self.header.hash != expected_hash {
            return Err(BlockError::Integrity(format!(
                "block {} hash mismatch: stored={}, computed={}",
                self.header.height,
                hex::encode(self.header.hash),
                hex::encode(expected_hash),
            )));
        }

        if self.header.height == 0 {
            if self.header.parent_hash != [0u8; 32] {
                return Err(BlockError::Integrity(
                    "genesis block must have zeroed parent_hash".to_string(),
                ));
            }
            return Ok(());
        }

        let expected_root = compute_ops_root(&self.operations);
        if self.header.ops_root != expected_root {
            return Err(BlockError::Integrity(format!(
                "block {} ops_root mismatch: stored={}, computed={}",
                self.header.height,
                hex::encode(self.header.ops_root),
                hex::encode(expected_root),
            )));
        }

        Ok(())
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn op_count(&self) -> usize {
        self.operations.len()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.header.hash)
    }
}

fn compute_header_hash(height: u64, parent_hash: &[u8; 32], ops_root: &[u8; 32]) -> [u8; 32] {
    blake3_hash_multi(&[
        height.to_le_bytes().as_slice(),
        parent_hash.as_slice(),
        ops_root.as_slice(),
    ])
}

/// Merkle root over each operation's JSON encoding, hashed as a
/// domain-separated leaf. An empty list yields all zeros.
pub fn compute_ops_root(operations: &[SignedOperation]) -> [u8; 32] {
    let leaves: Vec<[u8; 32]> = operations
        .iter()
        .map(|op| {
            let encoded = serde_json::to_vec(op).unwrap_or_default();
            domain_separated_hash(OPS_LEAF_CONTEXT, &encoded)
        })
        .collect();
    merkle_root(&leaves)
}
