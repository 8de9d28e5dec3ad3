//! # Cryptographic Primitives
//!
//! Everything the engine needs to authenticate a signer and derive
//! commitments:
//!
//! - **Ed25519** for operation signatures.
//! - **BLAKE3** for commitments, Merkle roots and consensus hashes.
//! - **SHA-256** for operation ids.
//! - **Base58Check** for addresses.
//!
//! Thin, type-safe wrappers over audited crates. Nothing is hand-rolled.

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{Address, AddressError};
pub use hash::{blake3_hash, double_sha256, hash20, merkle_root, sha256};
pub use keys::{KeyError, Keypair, PublicKey, Signature};
