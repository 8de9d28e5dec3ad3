//! # Storage Module
//!
//! In-memory data structures the engine folds blocks into.
//!
//! ## Architecture
//!
//! ```text
//! block.rs: Block structure, genesis block, hash/verify operations
//! records.rs: namespace, name and preorder records
//! pricing.rs: name and namespace price functions
//! state.rs: ChainState tables, Merkle state root
//! ```
//!
//! Persistence is an outer layer's concern. `ChainState` serializes with
//! serde, so a host can snapshot it however it likes.

pub mod block;
pub mod pricing;
pub mod records;
pub mod state;

pub use block::{Block, BlockHeader};
pub use pricing::{name_price, namespace_price};
pub use records::{
    NamePreorder, NameRecord, NameStatus, NamespacePreorder, NamespaceRecord, NamespaceState,
};
pub use state::{ChainState, ConsensusHash};
