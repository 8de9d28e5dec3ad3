//! Base58Check addresses and the payment scripts derived from them.
//!
//! ```text
//! public_key (32 bytes)
//!     -> hash20(public_key)                  -> 20-byte payload
//!     -> base58check(version || payload)     -> "1BoatSLRHtKNngkdXEeobR76b53LETtpyT"-style string
//! ```
//!
//! The payment script is the pay-to-pubkey-hash script over the same
//! payload. Preorder commitments bind the payer's script, not the address
//! string, so a commitment is independent of address encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::hash::{hash20, HASH20_LENGTH};
use super::keys::PublicKey;

/// Version byte prefixed to every address payload.
pub const ADDRESS_VERSION: u8 = 0x00;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xa9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xac;

/// Errors from parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid base58check encoding: {0}")]
    Encoding(String),

    #[error("unexpected address version {0:#04x}")]
    Version(u8),

    #[error("invalid address payload length: expected 21 bytes, got {0}")]
    Length(usize),
}

/// A validated Base58Check address.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    encoded: String,
    payload: [u8; HASH20_LENGTH],
}

impl Address {
    /// Derive the address controlled by `public_key`.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::from_payload(hash20(&[public_key.as_bytes()]))
    }

    /// Build an address from its 20-byte payload.
    pub fn from_payload(payload: [u8; HASH20_LENGTH]) -> Self {
        let mut versioned = Vec::with_capacity(1 + HASH20_LENGTH);
        versioned.push(ADDRESS_VERSION);
        versioned.extend_from_slice(&payload);
        let encoded = bs58::encode(versioned).with_check().into_string();
        Self { encoded, payload }
    }

    /// Parse and checksum-verify an address string.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let decoded = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| AddressError::Encoding(e.to_string()))?;
        if decoded.len() != 1 + HASH20_LENGTH {
            return Err(AddressError::Length(decoded.len()));
        }
        if decoded[0] != ADDRESS_VERSION {
            return Err(AddressError::Version(decoded[0]));
        }
        let mut payload = [0u8; HASH20_LENGTH];
        payload.copy_from_slice(&decoded[1..]);
        Ok(Self {
            encoded: s.to_string(),
            payload,
        })
    }

    /// The 20-byte key hash this address commits to.
    pub fn payload(&self) -> &[u8; HASH20_LENGTH] {
        &self.payload
    }

    /// The encoded address string.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Pay-to-pubkey-hash script for this address:
    /// `OP_DUP OP_HASH160 <20> payload OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn payment_script(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(25);
        script.push(OP_DUP);
        script.push(OP_HASH160);
        script.push(HASH20_LENGTH as u8);
        script.extend_from_slice(&self.payload);
        script.push(OP_EQUALVERIFY);
        script.push(OP_CHECKSIG);
        script
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.encoded
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encoded)
    }
}
