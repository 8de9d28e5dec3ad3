//! Records held in chain state.
//!
//! Every field here is consensus-critical: replicas must agree on every
//! byte, since [`ChainState::root_hash`](super::state::ChainState::root_hash)
//! commits to all of them.

use serde::{Deserialize, Serialize};

use crate::crypto::Address;
use crate::operation::{Commitment, NamespaceParams, ValueHash};

// ---------------------------------------------------------------------------
// Preorders
// ---------------------------------------------------------------------------

/// A blinded namespace reservation. The id stays hidden until reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacePreorder {
    pub commitment: Commitment,
    pub sender: Address,
    pub fee: u64,
    pub block_number: u64,
    /// First height at which the preorder is dead.
    pub expires_at: u64,
    pub consumed: bool,
}

impl NamespacePreorder {
    /// Unconsumed and not yet expired at `height`.
    pub fn is_live(&self, height: u64) -> bool {
        !self.consumed && height < self.expires_at
    }
}

/// A blinded name reservation: `sender` has paid to register a hidden name
/// in `namespace_id` for the address folded into the commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePreorder {
    pub commitment: Commitment,
    pub namespace_id: String,
    pub sender: Address,
    pub fee: u64,
    pub block_number: u64,
    /// First height at which the preorder is dead.
    pub expires_at: u64,
    /// Set once, by the register that claims it.
    pub consumed: bool,
}

impl NamePreorder {
    /// Unconsumed and not yet expired at `height`.
    pub fn is_live(&self, height: u64) -> bool {
        !self.consumed && height < self.expires_at
    }
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Lifecycle position of a disclosed namespace.
///
/// "None" and "Preordered" have no variant: the first is the absence of a
/// record, the second exists only as an unattributed [`NamespacePreorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamespaceState {
    Revealed,
    Ready,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRecord {
    pub namespace_id: String,
    pub state: NamespaceState,
    /// Payer of the preorder that was revealed.
    pub preorder_sender: Address,
    /// The only address allowed to make this namespace ready.
    pub reveal_address: Address,
    pub reveal_block: u64,
    /// A still-`Revealed` namespace lapses at this height.
    pub reveal_expires_at: u64,
    pub ready_block: Option<u64>,
    pub params: NamespaceParams,
    pub preorder: Commitment,
}

impl NamespaceRecord {
    pub fn is_ready(&self) -> bool {
        self.state == NamespaceState::Ready
    }

    /// Revealed and still within its reveal window.
    pub fn is_live_reveal(&self, height: u64) -> bool {
        self.state == NamespaceState::Revealed && height < self.reveal_expires_at
    }

    /// Expiry block for a name registered or renewed at `height`.
    pub fn name_expiry_from(&self, height: u64) -> Option<u64> {
        if self.params.is_infinite() {
            None
        } else {
            Some(height.saturating_add(u64::from(self.params.lifetime)))
        }
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameStatus {
    Registered,
    /// Terminal.
    Revoked,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub namespace_id: String,
    pub owner: Address,
    pub value_hash: Option<ValueHash>,
    pub registered_block: u64,
    pub last_renewed_block: u64,
    /// `None` in namespaces whose names never expire.
    pub expire_block: Option<u64>,
    pub status: NameStatus,
    /// Commitment of the preorder this registration consumed.
    pub preorder: Commitment,
}

impl NameRecord {
    pub fn is_revoked(&self) -> bool {
        self.status == NameStatus::Revoked
    }

    pub fn is_expired(&self, height: u64) -> bool {
        matches!(self.expire_block, Some(expiry) if height >= expiry)
    }
}
