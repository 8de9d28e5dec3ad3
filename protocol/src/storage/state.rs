//! # Chain State
//!
//! The authoritative naming tables, as of the last committed block. The
//! state is the fold of every block applied so far; nothing else feeds it.
//!
//! ## Tables
//!
//! ```text
//! namespace_preorders : Commitment → NamespacePreorder
//! namespaces          : namespace_id → NamespaceRecord
//! name_preorders      : Commitment → NamePreorder
//! names               : name → NameRecord
//! consensus_hashes    : height → ConsensusHash
//! ```
//!
//! Every table is a `BTreeMap`, so iteration order (and with it the state
//! root) is independent of insertion order.
//!
//! ## State Root
//!
//! ```text
//! leaf = BLAKE3-derive-key("bns state leaf v1", table_tag || key || record_json)
//! root = merkle_root(leaves in table order, then key order)
//! ```
//!
//! An empty state has a root of all zeros.
//!
//! ## Retention
//!
//! Preorders are never removed. A consumed or expired preorder stays in its
//! table, and in the root, for good, so the tables and the per-block cost
//! of cloning and rooting them grow with the whole history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::records::{NamePreorder, NameRecord, NamespacePreorder, NamespaceRecord};
use crate::crypto::hash::{domain_separated_hash, merkle_root};
use crate::crypto::Address;
use crate::operation::Commitment;

/// Truncated per-block digest replicas compare to detect divergence.
pub type ConsensusHash = [u8; 16];

const STATE_LEAF_CONTEXT: &str = "bns state leaf v1";

const TAG_NAMESPACE_PREORDER: u8 = 0x01;
const TAG_NAMESPACE: u8 = 0x02;
const TAG_NAME_PREORDER: u8 = 0x03;
const TAG_NAME: u8 = 0x04;

/// Naming state as of `height`.
///
/// Cloning is a deep copy; the block processor clones once per block to get
/// a private working copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainState {
    /// Height of the last committed block. 0 before any block.
    height: u64,
    /// Hash of the last committed block.
    last_block_hash: [u8; 32],
    namespace_preorders: BTreeMap<Commitment, NamespacePreorder>,
    namespaces: BTreeMap<String, NamespaceRecord>,
    name_preorders: BTreeMap<Commitment, NamePreorder>,
    names: BTreeMap<String, NameRecord>,
    consensus_hashes: BTreeMap<u64, ConsensusHash>,
}

impl ChainState {
    /// Empty state anchored at a genesis block hash.
    pub fn new(genesis_hash: [u8; 32]) -> Self {
        Self {
            last_block_hash: genesis_hash,
            ..Self::default()
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn last_block_hash(&self) -> [u8; 32] {
        self.last_block_hash
    }

    // -- raw lookups (no liveness filtering) --------------------------------

    pub fn namespace_preorder(&self, commitment: &Commitment) -> Option<&NamespacePreorder> {
        self.namespace_preorders.get(commitment)
    }

    pub fn namespace(&self, namespace_id: &str) -> Option<&NamespaceRecord> {
        self.namespaces.get(namespace_id)
    }

    pub fn name_preorder(&self, commitment: &Commitment) -> Option<&NamePreorder> {
        self.name_preorders.get(commitment)
    }

    pub fn name(&self, name: &str) -> Option<&NameRecord> {
        self.names.get(name)
    }

    pub fn consensus_hash_at(&self, height: u64) -> Option<ConsensusHash> {
        self.consensus_hashes.get(&height).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &NameRecord> {
        self.names.values()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &NamespaceRecord> {
        self.namespaces.values()
    }

    /// Names currently recorded with `owner`, in name order. Includes
    /// revoked and expired records; callers filter.
    pub fn names_with_owner<'a>(
        &'a self,
        owner: &'a Address,
    ) -> impl Iterator<Item = &'a NameRecord> + 'a {
        self.names.values().filter(move |r| &r.owner == owner)
    }

    /// Number of name records (any status).
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    // -- mutation (engine only) ---------------------------------------------

    pub(crate) fn put_namespace_preorder(&mut self, preorder: NamespacePreorder) {
        self.namespace_preorders.insert(preorder.commitment, preorder);
    }

    pub(crate) fn namespace_preorder_mut(
        &mut self,
        commitment: &Commitment,
    ) -> Option<&mut NamespacePreorder> {
        self.namespace_preorders.get_mut(commitment)
    }

    pub(crate) fn put_namespace(&mut self, record: NamespaceRecord) {
        self.namespaces.insert(record.namespace_id.clone(), record);
    }

    pub(crate) fn namespace_mut(&mut self, namespace_id: &str) -> Option<&mut NamespaceRecord> {
        self.namespaces.get_mut(namespace_id)
    }

    pub(crate) fn put_name_preorder(&mut self, preorder: NamePreorder) {
        self.name_preorders.insert(preorder.commitment, preorder);
    }

    pub(crate) fn name_preorder_mut(&mut self, commitment: &Commitment) -> Option<&mut NamePreorder> {
        self.name_preorders.get_mut(commitment)
    }

    pub(crate) fn put_name(&mut self, record: NameRecord) {
        self.names.insert(record.name.clone(), record);
    }

    pub(crate) fn name_mut(&mut self, name: &str) -> Option<&mut NameRecord> {
        self.names.get_mut(name)
    }

    /// Record a committed block: advance the tip and store its consensus hash.
    pub(crate) fn advance(&mut self, height: u64, block_hash: [u8; 32], consensus: ConsensusHash) {
        self.height = height;
        self.last_block_hash = block_hash;
        self.consensus_hashes.insert(height, consensus);
    }

    // -- commitment ---------------------------------------------------------

    /// Merkle root over every record in every table.
    pub fn root_hash(&self) -> [u8; 32] {
        let mut leaves = Vec::with_capacity(
            self.namespace_preorders.len()
                + self.namespaces.len()
                + self.name_preorders.len()
                + self.names.len(),
        );

        for (key, rec) in &self.namespace_preorders {
            leaves.push(leaf(TAG_NAMESPACE_PREORDER, key.as_bytes(), rec));
        }
        for (key, rec) in &self.namespaces {
            leaves.push(leaf(TAG_NAMESPACE, key.as_bytes(), rec));
        }
        for (key, rec) in &self.name_preorders {
            leaves.push(leaf(TAG_NAME_PREORDER, key.as_bytes(), rec));
        }
        for (key, rec) in &self.names {
            leaves.push(leaf(TAG_NAME, key.as_bytes(), rec));
        }

        merkle_root(&leaves)
    }
}

fn leaf<T: Serialize>(tag: u8, key: &[u8], record: &T) -> [u8; 32] {
    let body = serde_json::to_vec(record).unwrap_or_default();
    let mut preimage = Vec::with_capacity(1 + key.len() + body.len());
    preimage.push(tag);
    preimage.extend_from_slice(key);
    preimage.extend_from_slice(&body);
    domain_separated_hash(STATE_LEAF_CONTEXT, &preimage)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
