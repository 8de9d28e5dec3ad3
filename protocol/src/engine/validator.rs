//! # Operation Validator
//!
//! `validate(state, op, height, params)` decides whether one signed
//! operation is legal against `state` at block `height`, and if so which
//! [`StateDelta`] it produces. It is a pure function: no I/O, no clock, no
//! mutation. Same inputs, same answer, on every replica.
//!
//! ## Check order
//!
//! State checks run before the signature check. A non-owner revoking a name
//! nobody registered is told `NotRegistered`, not `BadSignature`.
//!
//! ```text
//! name_preorder      ns id syntax → ns READY → duplicate → signature
//! name_register      name syntax → ns READY → preorder → existing name → fee → signature
//! update/renew/...   name syntax → exists → revoked → expired → owner signature → (renew) fee
//! namespace_preorder duplicate → signature
//! namespace_reveal   id syntax → params → existing → preorder → fee → signature
//! namespace_ready    live reveal → revealer signature
//! ```

use super::delta::StateDelta;
use crate::config::ConsensusParams;
use crate::crypto::Address;
use crate::error::RejectReason;
use crate::naming::{split_name, validate_namespace_id};
use crate::operation::{
    name_commitment, namespace_commitment, Commitment, NamespaceParams, Operation,
    SignedOperation,
};
use crate::storage::pricing::{name_price, namespace_price};
use crate::storage::records::{
    NamePreorder, NameRecord, NameStatus, NamespacePreorder, NamespaceRecord, NamespaceState,
};
use crate::storage::ChainState;

/// Validate `op` against `state` as part of block `height`.
pub fn validate(
    state: &ChainState,
    op: &SignedOperation,
    height: u64,
    params: &ConsensusParams,
) -> Result<StateDelta, RejectReason> {
    match &op.operation {
        Operation::NamespacePreorder { commitment } => {
            namespace_preorder(state, op, *commitment, height, params)
        }
        Operation::NamespaceReveal {
            namespace_id,
            reveal_address,
            params: ns_params,
        } => namespace_reveal(state, op, namespace_id, reveal_address, ns_params, height, params),
        Operation::NamespaceReady { namespace_id } => {
            namespace_ready(state, op, namespace_id, height)
        }
        Operation::NamePreorder {
            namespace_id,
            commitment,
        } => name_preorder(state, op, namespace_id, *commitment, height, params),
        Operation::NameRegister {
            name,
            register_address,
        } => name_register(state, op, name, register_address, height, params),
        Operation::NameUpdate { name, value_hash } => {
            owned_name(state, op, name, height, params)?;
            Ok(StateDelta::NameUpdated {
                name: name.clone(),
                value_hash: *value_hash,
            })
        }
        Operation::NameRenew { name } => name_renew(state, op, name, height, params),
        Operation::NameTransfer {
            name,
            recipient,
            keep_data,
        } => {
            owned_name(state, op, name, height, params)?;
            Ok(StateDelta::NameTransferred {
                name: name.clone(),
                new_owner: recipient.clone(),
                keep_data: *keep_data,
            })
        }
        Operation::NameRevoke { name } => {
            owned_name(state, op, name, height, params)?;
            Ok(StateDelta::NameRevoked { name: name.clone() })
        }
    }
}

// ---------------------------------------------------------------------------
// Signature helpers
// ---------------------------------------------------------------------------

fn bad_signature(op: &SignedOperation) -> RejectReason {
    RejectReason::BadSignature {
        signer: op.sender_address().to_string(),
    }
}

fn require_signature(op: &SignedOperation) -> Result<(), RejectReason> {
    if op.verify_signature() {
        Ok(())
    } else {
        Err(bad_signature(op))
    }
}

/// Signature verifies and the signer controls `expected`.
fn require_signer(op: &SignedOperation, expected: &Address) -> Result<(), RejectReason> {
    if op.verify_signature() && &op.sender_address() == expected {
        Ok(())
    } else {
        Err(bad_signature(op))
    }
}

fn require_fee(paid: u64, required: u64) -> Result<(), RejectReason> {
    if paid >= required {
        Ok(())
    } else {
        Err(RejectReason::InsufficientFee { required, paid })
    }
}

// ---------------------------------------------------------------------------
// Namespace operations
// ---------------------------------------------------------------------------

fn namespace_preorder(
    state: &ChainState,
    op: &SignedOperation,
    commitment: Commitment,
    height: u64,
    params: &ConsensusParams,
) -> Result<StateDelta, RejectReason> {
    if state
        .namespace_preorder(&commitment)
        .is_some_and(|p| p.is_live(height))
    {
        return Err(RejectReason::DuplicatePreorder {
            commitment: commitment.to_hex(),
        });
    }
    require_signature(op)?;

    Ok(StateDelta::NamespacePreordered {
        preorder: NamespacePreorder {
            commitment,
            sender: op.sender_address(),
            fee: op.fee,
            block_number: height,
            expires_at: height.saturating_add(params.namespace_preorder_expire),
            consumed: false,
        },
    })
}

fn namespace_reveal(
    state: &ChainState,
    op: &SignedOperation,
    namespace_id: &str,
    reveal_address: &Address,
    ns_params: &NamespaceParams,
    height: u64,
    params: &ConsensusParams,
) -> Result<StateDelta, RejectReason> {
    validate_namespace_id(namespace_id, params)?;
    ns_params.validate()?;

    let transition = |reason: &str| RejectReason::InvalidStateTransition {
        namespace_id: namespace_id.to_string(),
        reason: reason.to_string(),
    };

    if let Some(existing) = state.namespace(namespace_id) {
        if existing.is_ready() {
            return Err(transition("namespace is already ready"));
        }
        if existing.is_live_reveal(height) {
            return Err(transition("namespace is already revealed"));
        }
    }

    let sender = op.sender_address();
    let commitment = namespace_commitment(namespace_id, &sender.payment_script(), reveal_address);
    let preorder = state
        .namespace_preorder(&commitment)
        .filter(|p| p.is_live(height))
        .ok_or_else(|| transition("no live preorder matches this reveal"))?;

    require_fee(preorder.fee, namespace_price(namespace_id, params))?;
    require_signature(op)?;

    Ok(StateDelta::NamespaceRevealed {
        record: NamespaceRecord {
            namespace_id: namespace_id.to_string(),
            state: NamespaceState::Revealed,
            preorder_sender: sender,
            reveal_address: reveal_address.clone(),
            reveal_block: height,
            reveal_expires_at: height.saturating_add(params.namespace_reveal_expire),
            ready_block: None,
            params: ns_params.clone(),
            preorder: commitment,
        },
        consumed: commitment,
    })
}

fn namespace_ready(
    state: &ChainState,
    op: &SignedOperation,
    namespace_id: &str,
    height: u64,
) -> Result<StateDelta, RejectReason> {
    let transition = |reason: &str| RejectReason::InvalidStateTransition {
        namespace_id: namespace_id.to_string(),
        reason: reason.to_string(),
    };

    let record = match state.namespace(namespace_id) {
        None => return Err(transition("namespace is not revealed")),
        Some(ns) if ns.is_ready() => return Err(transition("namespace is already ready")),
        Some(ns) if !ns.is_live_reveal(height) => {
            return Err(transition("namespace reveal has lapsed"))
        }
        Some(ns) => ns,
    };

    require_signer(op, &record.reveal_address)?;

    Ok(StateDelta::NamespaceReadied {
        namespace_id: namespace_id.to_string(),
        block: height,
    })
}

fn ready_namespace<'a>(
    state: &'a ChainState,
    namespace_id: &str,
) -> Result<&'a NamespaceRecord, RejectReason> {
    state
        .namespace(namespace_id)
        .filter(|ns| ns.is_ready())
        .ok_or_else(|| RejectReason::NamespaceNotReady {
            namespace_id: namespace_id.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Name operations
// ---------------------------------------------------------------------------

fn name_preorder(
    state: &ChainState,
    op: &SignedOperation,
    namespace_id: &str,
    commitment: Commitment,
    height: u64,
    params: &ConsensusParams,
) -> Result<StateDelta, RejectReason> {
    validate_namespace_id(namespace_id, params)?;
    ready_namespace(state, namespace_id)?;

    if state
        .name_preorder(&commitment)
        .is_some_and(|p| p.is_live(height))
    {
        return Err(RejectReason::DuplicatePreorder {
            commitment: commitment.to_hex(),
        });
    }
    require_signature(op)?;

    Ok(StateDelta::NamePreordered {
        preorder: NamePreorder {
            commitment,
            namespace_id: namespace_id.to_string(),
            sender: op.sender_address(),
            fee: op.fee,
            block_number: height,
            expires_at: height.saturating_add(params.name_preorder_expire),
            consumed: false,
        },
    })
}

fn name_register(
    state: &ChainState,
    op: &SignedOperation,
    name: &str,
    register_address: &Address,
    height: u64,
    params: &ConsensusParams,
) -> Result<StateDelta, RejectReason> {
    let (label, namespace_id) = split_name(name, params)?;
    let namespace = ready_namespace(state, namespace_id)?;

    let sender = op.sender_address();
    let commitment = name_commitment(name, &sender.payment_script(), register_address);
    let preorder = state
        .name_preorder(&commitment)
        .filter(|p| p.is_live(height) && p.namespace_id == namespace_id)
        .ok_or_else(|| RejectReason::NoMatchingPreorder {
            name: name.to_string(),
        })?;

    if let Some(existing) = state.name(name) {
        if existing.is_revoked() {
            return Err(RejectReason::RevokedName {
                name: name.to_string(),
            });
        }
        if !existing.is_expired(height) {
            return Err(RejectReason::NameAlreadyRegistered {
                name: name.to_string(),
            });
        }
    }

    require_fee(preorder.fee, name_price(label, &namespace.params, params))?;
    require_signature(op)?;

    Ok(StateDelta::NameRegistered {
        record: NameRecord {
            name: name.to_string(),
            namespace_id: namespace_id.to_string(),
            owner: register_address.clone(),
            value_hash: None,
            registered_block: height,
            last_renewed_block: height,
            expire_block: namespace.name_expiry_from(height),
            status: NameStatus::Registered,
            preorder: commitment,
        },
        consumed: commitment,
    })
}

fn name_renew(
    state: &ChainState,
    op: &SignedOperation,
    name: &str,
    height: u64,
    params: &ConsensusParams,
) -> Result<StateDelta, RejectReason> {
    let record = owned_name(state, op, name, height, params)?;
    let namespace = ready_namespace(state, &record.namespace_id)?;
    let (label, _) = split_name(name, params)?;

    require_fee(op.fee, name_price(label, &namespace.params, params))?;

    Ok(StateDelta::NameRenewed {
        name: name.to_string(),
        block: height,
        expire_block: namespace.name_expiry_from(height),
    })
}

/// Shared gate for update, renew, transfer and revoke: the name is
/// registered, live, and the signer owns it.
fn owned_name<'a>(
    state: &'a ChainState,
    op: &SignedOperation,
    name: &str,
    height: u64,
    params: &ConsensusParams,
) -> Result<&'a NameRecord, RejectReason> {
    split_name(name, params)?;

    let record = state.name(name).ok_or_else(|| RejectReason::NotRegistered {
        name: name.to_string(),
    })?;
    if record.is_revoked() {
        return Err(RejectReason::RevokedName {
            name: name.to_string(),
        });
    }
    if let Some(expired_at) = record.expire_block.filter(|_| record.is_expired(height)) {
        return Err(RejectReason::NameExpired {
            name: name.to_string(),
            expired_at,
        });
    }
    require_signer(op, &record.owner)?;
    Ok(record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
