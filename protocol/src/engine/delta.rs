//! State deltas.
//!
//! The validator never mutates state. It returns a [`StateDelta`] naming
//! exactly one mutation, and the processor applies it to its working copy.
//! The set is closed: these nine variants are everything a block can do to
//! chain state.

use serde::{Deserialize, Serialize};

use crate::crypto::Address;
use crate::operation::{Commitment, ValueHash};
use crate::storage::records::{
    NamePreorder, NameRecord, NameStatus, NamespacePreorder, NamespaceRecord, NamespaceState,
};
use crate::storage::ChainState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "delta", rename_all = "snake_case")]
pub enum StateDelta {
    NamespacePreordered {
        preorder: NamespacePreorder,
    },
    /// Consumes `consumed` and inserts (or replaces a lapsed) reveal.
    NamespaceRevealed {
        record: NamespaceRecord,
        consumed: Commitment,
    },
    NamespaceReadied {
        namespace_id: String,
        block: u64,
    },
    NamePreordered {
        preorder: NamePreorder,
    },
    /// Consumes `consumed` and inserts (or replaces an expired) name.
    NameRegistered {
        record: NameRecord,
        consumed: Commitment,
    },
    NameUpdated {
        name: String,
        value_hash: ValueHash,
    },
    NameRenewed {
        name: String,
        block: u64,
        expire_block: Option<u64>,
    },
    NameTransferred {
        name: String,
        new_owner: Address,
        keep_data: bool,
    },
    NameRevoked {
        name: String,
    },
}

impl StateDelta {
    /// Apply this delta to `state`.
    ///
    /// Only called with deltas the validator produced against this same
    /// state, so every referenced record exists.
    pub fn apply(&self, state: &mut ChainState) {
        match self {
            Self::NamespacePreordered { preorder } => {
                state.put_namespace_preorder(preorder.clone());
            }
            Self::NamespaceRevealed { record, consumed } => {
                if let Some(p) = state.namespace_preorder_mut(consumed) {
                    p.consumed = true;
                }
                state.put_namespace(record.clone());
            }
            Self::NamespaceReadied {
                namespace_id,
                block,
            } => {
                if let Some(ns) = state.namespace_mut(namespace_id) {
                    ns.state = NamespaceState::Ready;
                    ns.ready_block = Some(*block);
                }
            }
            Self::NamePreordered { preorder } => {
                state.put_name_preorder(preorder.clone());
            }
            Self::NameRegistered { record, consumed } => {
                if let Some(p) = state.name_preorder_mut(consumed) {
                    p.consumed = true;
                }
                state.put_name(record.clone());
            }
            Self::NameUpdated { name, value_hash } => {
                if let Some(rec) = state.name_mut(name) {
                    rec.value_hash = Some(*value_hash);
                }
            }
            Self::NameRenewed {
                name,
                block,
                expire_block,
            } => {
                if let Some(rec) = state.name_mut(name) {
                    rec.last_renewed_block = *block;
                    rec.expire_block = *expire_block;
                }
            }
            Self::NameTransferred {
                name,
                new_owner,
                keep_data,
            } => {
                if let Some(rec) = state.name_mut(name) {
                    rec.owner = new_owner.clone();
                    if !keep_data {
                        rec.value_hash = None;
                    }
                }
            }
            Self::NameRevoked { name } => {
                if let Some(rec) = state.name_mut(name) {
                    rec.status = NameStatus::Revoked;
                }
            }
        }
    }
}
