//! # Operation Module
//!
//! The nine on-chain naming operations and how they are signed.
//!
//! ```text
//! types.rs: Operation (closed sum type), OpKind, NamespaceParams
//! commitment.rs: blinded preorder commitments
//! signing.rs: SignedOperation, sign_operation
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! namespace:  preorder ─► reveal ─► ready
//! name:       preorder ─► register ─► { update | renew | transfer }* ─► revoke
//! ```
//!
//! Preorders are blinded commitments; only the matching reveal/register
//! discloses what was reserved.

pub mod commitment;
pub mod signing;
pub mod types;

pub use commitment::{name_commitment, namespace_commitment, Commitment};
pub use signing::{sign_operation, SignedOperation};
pub use types::{NamespaceParams, OpKind, Operation, ValueHash};
