//! Error types for operation validation and block processing.
//!
//! Two very different failure classes live here:
//!
//! - [`RejectReason`]: one operation is not legal against current state.
//!   Local to that operation, reported in its outcome, never fatal.
//! - [`BlockError`]: the block itself cannot be applied (wrong height,
//!   broken linkage, tampered contents). The whole block is refused before
//!   any state is touched.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a single operation was rejected.
///
/// Rejections are deterministic: the same operation against the same state
/// always yields the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    /// A namespace operation arrived in the wrong lifecycle state.
    #[error("invalid state transition for namespace '{namespace_id}': {reason}")]
    InvalidStateTransition { namespace_id: String, reason: String },

    /// A live, unconsumed preorder with this commitment already exists.
    #[error("duplicate preorder {commitment}")]
    DuplicatePreorder { commitment: String },

    /// No live, unconsumed preorder matches this register.
    #[error("no matching preorder for '{name}'")]
    NoMatchingPreorder { name: String },

    /// The name is registered and has not expired.
    #[error("name '{name}' is already registered")]
    NameAlreadyRegistered { name: String },

    /// The name has no registration. A preorder alone does not count.
    #[error("name '{name}' is not registered")]
    NotRegistered { name: String },

    /// The signature does not verify, or the signer is not the key this
    /// operation requires.
    #[error("bad signature from {signer}")]
    BadSignature { signer: String },

    /// The fee paid does not cover the price.
    #[error("insufficient fee: required {required}, paid {paid}")]
    InsufficientFee { required: u64, paid: u64 },

    /// The name was revoked; revocation is permanent.
    #[error("name '{name}' is revoked")]
    RevokedName { name: String },

    /// The name's registration lapsed at `expired_at`.
    #[error("name '{name}' expired at block {expired_at}")]
    NameExpired { name: String, expired_at: u64 },

    /// The name's namespace does not exist or is not ready yet.
    #[error("namespace '{namespace_id}' is not ready")]
    NamespaceNotReady { namespace_id: String },

    /// The name or namespace id breaks the syntax rules.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A namespace reveal carried out-of-range pricing or lifetime values.
    #[error("invalid namespace parameters: {reason}")]
    InvalidNamespaceParams { reason: String },
}

/// The kind of a [`RejectReason`], without its payload.
///
/// `Display` gives the stable string outer layers report as `error_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidStateTransition,
    DuplicatePreorder,
    NoMatchingPreorder,
    NameAlreadyRegistered,
    NotRegistered,
    BadSignature,
    InsufficientFee,
    RevokedName,
    NameExpired,
    NamespaceNotReady,
    InvalidName,
    InvalidNamespaceParams,
}

impl RejectReason {
    /// Returns the payload-free kind of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::DuplicatePreorder { .. } => ErrorKind::DuplicatePreorder,
            Self::NoMatchingPreorder { .. } => ErrorKind::NoMatchingPreorder,
            Self::NameAlreadyRegistered { .. } => ErrorKind::NameAlreadyRegistered,
            Self::NotRegistered { .. } => ErrorKind::NotRegistered,
            Self::BadSignature { .. } => ErrorKind::BadSignature,
            Self::InsufficientFee { .. } => ErrorKind::InsufficientFee,
            Self::RevokedName { .. } => ErrorKind::RevokedName,
            Self::NameExpired { .. } => ErrorKind::NameExpired,
            Self::NamespaceNotReady { .. } => ErrorKind::NamespaceNotReady,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::InvalidNamespaceParams { .. } => ErrorKind::InvalidNamespaceParams,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidStateTransition => "InvalidStateTransition",
            Self::DuplicatePreorder => "DuplicatePreorder",
            Self::NoMatchingPreorder => "NoMatchingPreorder",
            Self::NameAlreadyRegistered => "NameAlreadyRegistered",
            Self::NotRegistered => "NotRegistered",
            Self::BadSignature => "BadSignature",
            Self::InsufficientFee => "InsufficientFee",
            Self::RevokedName => "RevokedName",
            Self::NameExpired => "NameExpired",
            Self::NamespaceNotReady => "NamespaceNotReady",
            Self::InvalidName => "InvalidName",
            Self::InvalidNamespaceParams => "InvalidNamespaceParams",
        };
        f.write_str(s)
    }
}

/// Why a whole block was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// Blocks must arrive at exactly `last committed height + 1`.
    #[error("block out of order: expected height {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },

    /// The block does not extend the last committed block.
    #[error("block {height} does not extend the committed tip: expected parent {expected}, got {got}")]
    ParentMismatch {
        height: u64,
        expected: String,
        got: String,
    },

    /// The block's stored hash or operation root does not match its contents.
    #[error("block integrity check failed: {0}")]
    Integrity(String),
}
