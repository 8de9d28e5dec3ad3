//! Blinded preorder commitments.
//!
//! A preorder publishes only a 20-byte commitment:
//!
//! ```text
//! commitment = hash20( id_or_name || payment_script(payer) || recipient_address )
//! ```
//!
//! The later reveal/register discloses `id_or_name` and `recipient_address`;
//! the engine recomputes the commitment with the revealing signer's script.
//! A different payer therefore can never claim someone else's preorder.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::hash::{hash20, HASH20_LENGTH};
use crate::crypto::Address;

/// A 20-byte preorder commitment. Serialized as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commitment([u8; HASH20_LENGTH]);

impl Commitment {
    /// Wrap raw commitment bytes.
    pub fn from_bytes(bytes: [u8; HASH20_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw commitment bytes.
    pub fn as_bytes(&self) -> &[u8; HASH20_LENGTH] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 40-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; HASH20_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl TryFrom<String> for Commitment {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Commitment> for String {
    fn from(c: Commitment) -> Self {
        c.to_hex()
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

/// Commitment for a name preorder.
pub fn name_commitment(name: &str, payment_script: &[u8], register_address: &Address) -> Commitment {
    Commitment(hash20(&[
        name.as_bytes(),
        payment_script,
        register_address.as_str().as_bytes(),
    ]))
}

/// Commitment for a namespace preorder.
pub fn namespace_commitment(
    namespace_id: &str,
    payment_script: &[u8],
    reveal_address: &Address,
) -> Commitment {
    Commitment(hash20(&[
        namespace_id.as_bytes(),
        payment_script,
        reveal_address.as_str().as_bytes(),
    ]))
}
