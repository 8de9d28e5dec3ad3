//! # Hashing Utilities
//!
//! Hash functions used by the naming engine. Two families, no more:
//!
//! - **BLAKE3**: commitments, Merkle roots, state roots and consensus
//!   hashes. Everything the engine derives for itself.
//!
//! - **SHA-256**: operation ids, as `double_sha256` over the canonical
//!   signable bytes, the same shape wallets already compute for
//!   transaction ids.
//!
//! ## Commitment width
//!
//! Preorder commitments and address payloads are 20 bytes, the width of a
//! classic `hash160`. We take the first 20 bytes of a BLAKE3 digest instead
//! of RIPEMD-160(SHA-256(x)): same size on the wire, one hash instead of two.

use sha2::{Digest, Sha256};

/// Width of a truncated commitment / address hash.
pub const HASH20_LENGTH: usize = 20;

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
///
/// Used for operation ids.
///
/// # Example
///
/// ```
/// use bns_protocol::crypto::double_sha256;
///
/// let op_id = double_sha256(b"raw operation bytes");
/// assert_eq!(op_id.len(), 32);
/// ```
pub fn double_sha256(data: &[u8]) -> Vec<u8> {
    sha256(&sha256(data))
}

/// Compute the BLAKE3 hash of the input data.
///
/// # Example
///
/// ```
/// use bns_protocol::crypto::blake3_hash;
///
/// let hash = blake3_hash(b"foo.test");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Hash multiple byte slices together without concatenation overhead.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// BLAKE3 truncated to 20 bytes, hashing the parts in order.
///
/// This is the commitment hash for preorders and the payload hash for
/// addresses.
pub fn hash20(parts: &[&[u8]]) -> [u8; HASH20_LENGTH] {
    let full = blake3_hash_multi(parts);
    let mut out = [0u8; HASH20_LENGTH];
    out.copy_from_slice(&full[..HASH20_LENGTH]);
    out
}

/// Compute a domain-separated hash using BLAKE3's `derive_key` mode.
///
/// Keeps state-root leaves, consensus hashes and operation Merkle leaves
/// from ever colliding with each other even when the input bytes agree.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

/// Context for interior Merkle nodes. Leaves are hashed under their own
/// contexts by the caller, so a node can never pass for a leaf.
const MERKLE_NODE_CONTEXT: &str = "bns merkle node v1";

fn merkle_node(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(left);
    preimage[32..].copy_from_slice(right);
    domain_separated_hash(MERKLE_NODE_CONTEXT, &preimage)
}

/// Compute a binary Merkle root over leaf hashes.
///
/// An odd node at the end of a level is promoted to the next level
/// unchanged, never paired with itself, so `[a, b, c]` and `[a, b, c, c]`
/// have different roots. A single leaf is its own root. An empty input
/// yields all zeros.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut current_level: Vec<[u8; 32]> = leaves.to_vec();

    while current_level.len() > 1 {
        let mut next_level = Vec::with_capacity((current_level.len() + 1) / 2);

        for chunk in current_level.chunks(2) {
            if let [left, right] = chunk {
                next_level.push(merkle_node(left, right));
            } else {
                next_level.push(chunk[0]);
            }
        }

        current_level = next_level;
    }

    current_level[0]
}
