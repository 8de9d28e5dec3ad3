//! # Consensus Configuration & Constants
//!
//! Every consensus-relevant number lives here. Two nodes that disagree on
//! any of these will compute different state from the same blocks, so
//! treat a change as a hard fork.
//!
//! The constants are the defaults. [`ConsensusParams`] bundles them into a
//! value the engine is constructed with, so tests and test networks can
//! shorten windows without touching code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Engine rule-set version. Mixed into every operation's signable bytes so
/// signatures never carry across incompatible rule sets.
pub const ENGINE_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Time windows (in blocks)
// ---------------------------------------------------------------------------

/// Roughly one day of blocks at ten-minute spacing.
pub const BLOCKS_PER_DAY: u64 = 144;

/// Roughly one year of blocks.
pub const BLOCKS_PER_YEAR: u64 = 52_595;

/// A name preorder must be registered within this many blocks.
pub const NAME_PREORDER_EXPIRE: u64 = BLOCKS_PER_DAY;

/// A namespace preorder must be revealed within this many blocks.
pub const NAMESPACE_PREORDER_EXPIRE: u64 = BLOCKS_PER_DAY;

/// A revealed namespace must be made ready within this many blocks or it
/// lapses and its id may be revealed again.
pub const NAMESPACE_REVEAL_EXPIRE: u64 = BLOCKS_PER_YEAR;

/// Namespace lifetime value meaning "names never expire".
pub const NAMESPACE_LIFE_INFINITE: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Smallest name price unit; name prices are multiples of it.
pub const NAME_COST_UNIT: u64 = 100;

/// Namespace price for a one-character id.
pub const NAMESPACE_1_CHAR_COST: u64 = 40_000_000_000;

/// Namespace price for a two- or three-character id.
pub const NAMESPACE_23_CHAR_COST: u64 = 4_000_000_000;

/// Namespace price for a four- to seven-character id.
pub const NAMESPACE_4567_CHAR_COST: u64 = 400_000_000;

/// Namespace price for an id of eight or more characters.
pub const NAMESPACE_8UP_CHAR_COST: u64 = 40_000_000;

// ---------------------------------------------------------------------------
// Syntax limits
// ---------------------------------------------------------------------------

/// Maximum length of a fully-qualified name, namespace suffix included.
pub const MAX_NAME_LENGTH: usize = 37;

/// Maximum length of a namespace id.
pub const MAX_NAMESPACE_ID_LENGTH: usize = 19;

/// Number of price buckets a namespace defines (one per name length,
/// the last covering every longer name).
pub const PRICE_BUCKET_COUNT: usize = 16;

/// Largest allowed bucket exponent.
pub const MAX_BUCKET_EXPONENT: u8 = 15;

/// Largest allowed vowel / non-alpha discount.
pub const MAX_DISCOUNT: u8 = 15;

// ---------------------------------------------------------------------------
// ConsensusParams
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating [`ConsensusParams`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse consensus params: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid consensus params: {0}")]
    Invalid(String),
}

/// The consensus parameters an engine instance runs with.
///
/// Missing JSON fields fall back to the constants above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusParams {
    pub name_preorder_expire: u64,
    pub namespace_preorder_expire: u64,
    pub namespace_reveal_expire: u64,
    pub name_cost_unit: u64,
    /// Namespace prices by id length tier: 1, 2–3, 4–7, 8+.
    pub namespace_prices: [u64; 4],
    pub max_name_length: usize,
    pub max_namespace_id_length: usize,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            name_preorder_expire: NAME_PREORDER_EXPIRE,
            namespace_preorder_expire: NAMESPACE_PREORDER_EXPIRE,
            namespace_reveal_expire: NAMESPACE_REVEAL_EXPIRE,
            name_cost_unit: NAME_COST_UNIT,
            namespace_prices: [
                NAMESPACE_1_CHAR_COST,
                NAMESPACE_23_CHAR_COST,
                NAMESPACE_4567_CHAR_COST,
                NAMESPACE_8UP_CHAR_COST,
            ],
            max_name_length: MAX_NAME_LENGTH,
            max_namespace_id_length: MAX_NAMESPACE_ID_LENGTH,
        }
    }
}

impl ConsensusParams {
    /// Parse params from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject parameter sets the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_preorder_expire == 0 {
            return Err(ConfigError::Invalid("name_preorder_expire must be > 0".into()));
        }
        if self.namespace_preorder_expire == 0 {
            return Err(ConfigError::Invalid(
                "namespace_preorder_expire must be > 0".into(),
            ));
        }
        if self.namespace_reveal_expire == 0 {
            return Err(ConfigError::Invalid("namespace_reveal_expire must be > 0".into()));
        }
        if self.name_cost_unit == 0 {
            return Err(ConfigError::Invalid("name_cost_unit must be > 0".into()));
        }
        if self.max_namespace_id_length == 0
            || self.max_name_length <= self.max_namespace_id_length
        {
            return Err(ConfigError::Invalid(format!(
                "max_name_length ({}) must exceed max_namespace_id_length ({}) and both be > 0",
                self.max_name_length, self.max_namespace_id_length
            )));
        }
        Ok(())
    }
}
