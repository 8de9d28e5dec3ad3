// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # BNS Protocol: Naming Consensus Engine
//!
//! Tracks namespaces and names through a strict sequence of on-chain
//! operations and decides, deterministically from chain history alone,
//! which operation is legal at any point.
//!
//! Two replicas fed the same blocks end with the same state root and the
//! same consensus hash. Everything else (wallets, broadcast, RPC, disk) is
//! somebody else's problem.
//!
//! ## Architecture
//!
//! - **crypto**: BLAKE3 / SHA-256 hashing, Ed25519 keys, base58check addresses.
//! - **operation**: The nine naming operations, commitments, signing.
//! - **naming**: Name and namespace id syntax.
//! - **storage**: Records, pricing, chain state and blocks.
//! - **engine**: Validator, block processor, query interface.
//! - **config**: Consensus constants and parameters.
//! - **error**: Per-operation rejections and block-level faults.
//! - **logging**: `tracing` subscriber setup.
//!
//! ## Lifecycle
//!
//! ```text
//! namespace:  preorder ─► reveal ─► ready
//! name:       preorder ─► register ─► update / renew / transfer ─► revoke
//! ```
//!
//! A preorder confers nothing but the right to register. Until the
//! register lands, the name does not exist.

pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod logging;
pub mod naming;
pub mod operation;
pub mod storage;

pub use config::ConsensusParams;
pub use engine::{BlockProcessor, BlockReceipt, NamingQuery, OperationOutcome};
pub use error::{BlockError, ErrorKind, RejectReason};
pub use operation::{sign_operation, Operation, SignedOperation};
pub use storage::{Block, ChainState};
