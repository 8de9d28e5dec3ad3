//! # Engine Module
//!
//! The naming state machine.
//!
//! ```text
//! validator.rs: pure validate(state, op, height, params) -> Result<StateDelta, RejectReason>
//! delta.rs: StateDelta, the closed set of mutations
//! processor.rs: BlockProcessor: single writer, snapshot commit, receipts
//! query.rs: NamingQuery: read-only view of committed state
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! Block ─► BlockProcessor ─► validate ─► StateDelta ─► working ChainState
//!                                                           │
//!                         readers ◄── Arc<ChainState> ◄── commit
//! ```

pub mod delta;
pub mod processor;
pub mod query;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use delta::StateDelta;
pub use processor::{BlockProcessor, BlockReceipt, OperationOutcome, ProcessorPhase};
pub use query::NamingQuery;
pub use validator::validate;
