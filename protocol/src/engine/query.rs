//! Read-only queries over committed state.
//!
//! Raw [`ChainState`] lookups return whatever record exists. The
//! [`NamingQuery`] view is what callers outside the engine should use: it
//! hides records that are no longer meaningful at the committed height
//! (lapsed reveals, dead preorders).

use super::processor::BlockProcessor;
use crate::crypto::Address;
use crate::operation::{name_commitment, Commitment};
use crate::storage::records::{NamePreorder, NameRecord, NamespaceRecord};
use crate::storage::{ChainState, ConsensusHash};

pub trait NamingQuery {
    /// A READY namespace. Revealed-but-not-ready namespaces are absent.
    fn get_namespace(&self, namespace_id: &str) -> Option<NamespaceRecord>;

    /// A namespace that is revealed, not yet ready, and not lapsed.
    fn get_namespace_reveal(&self, namespace_id: &str) -> Option<NamespaceRecord>;

    /// A name record in any status, revoked and expired included.
    fn get_name(&self, name: &str) -> Option<NameRecord>;

    /// The live, unconsumed preorder `payment_script` made for `name` on
    /// behalf of `register_address`.
    fn get_name_preorder(
        &self,
        name: &str,
        payment_script: &[u8],
        register_address: &Address,
    ) -> Option<NamePreorder> {
        self.get_name_preorder_by_commitment(&name_commitment(
            name,
            payment_script,
            register_address,
        ))
    }

    /// The live, unconsumed preorder with this commitment.
    fn get_name_preorder_by_commitment(&self, commitment: &Commitment) -> Option<NamePreorder>;

    /// Registered, unexpired names owned by `owner`, sorted.
    fn names_owned_by(&self, owner: &Address) -> Vec<String>;

    /// Registered, unexpired names in `namespace_id`, sorted.
    fn names_in_namespace(&self, namespace_id: &str) -> Vec<String>;

    fn consensus_hash(&self, height: u64) -> Option<ConsensusHash>;

    fn block_height(&self) -> u64;

    fn state_root(&self) -> [u8; 32];
}

fn is_active(record: &NameRecord, height: u64) -> bool {
    !record.is_revoked() && !record.is_expired(height)
}

impl NamingQuery for ChainState {
    fn get_namespace(&self, namespace_id: &str) -> Option<NamespaceRecord> {
        self.namespace(namespace_id)
            .filter(|ns| ns.is_ready())
            .cloned()
    }

    fn get_namespace_reveal(&self, namespace_id: &str) -> Option<NamespaceRecord> {
        self.namespace(namespace_id)
            .filter(|ns| ns.is_live_reveal(self.height()))
            .cloned()
    }

    fn get_name(&self, name: &str) -> Option<NameRecord> {
        self.name(name).cloned()
    }

    fn get_name_preorder_by_commitment(&self, commitment: &Commitment) -> Option<NamePreorder> {
        self.name_preorder(commitment)
            .filter(|p| p.is_live(self.height()))
            .cloned()
    }

    fn names_owned_by(&self, owner: &Address) -> Vec<String> {
        self.names_with_owner(owner)
            .filter(|r| is_active(r, self.height()))
            .map(|r| r.name.clone())
            .collect()
    }

    fn names_in_namespace(&self, namespace_id: &str) -> Vec<String> {
        self.names()
            .filter(|r| r.namespace_id == namespace_id && is_active(r, self.height()))
            .map(|r| r.name.clone())
            .collect()
    }

    fn consensus_hash(&self, height: u64) -> Option<ConsensusHash> {
        self.consensus_hash_at(height)
    }

    fn block_height(&self) -> u64 {
        self.height()
    }

    fn state_root(&self) -> [u8; 32] {
        self.root_hash()
    }
}

/// Every query reads one snapshot, so a single call never straddles a
/// commit. Callers needing several consistent reads should take
/// [`BlockProcessor::snapshot`] once and query that.
impl NamingQuery for BlockProcessor {
    fn get_namespace(&self, namespace_id: &str) -> Option<NamespaceRecord> {
        self.snapshot().get_namespace(namespace_id)
    }

    fn get_namespace_reveal(&self, namespace_id: &str) -> Option<NamespaceRecord> {
        self.snapshot().get_namespace_reveal(namespace_id)
    }

    fn get_name(&self, name: &str) -> Option<NameRecord> {
        self.snapshot().get_name(name)
    }

    fn get_name_preorder_by_commitment(&self, commitment: &Commitment) -> Option<NamePreorder> {
        self.snapshot().get_name_preorder_by_commitment(commitment)
    }

    fn names_owned_by(&self, owner: &Address) -> Vec<String> {
        self.snapshot().names_owned_by(owner)
    }

    fn names_in_namespace(&self, namespace_id: &str) -> Vec<String> {
        self.snapshot().names_in_namespace(namespace_id)
    }

    fn consensus_hash(&self, height: u64) -> Option<ConsensusHash> {
        self.snapshot().consensus_hash_at(height)
    }

    fn block_height(&self) -> u64 {
        self.snapshot().height()
    }

    fn state_root(&self) -> [u8; 32] {
        self.snapshot().root_hash()
    }
}
