//! Core type definitions for naming operations.
//!
//! [`Operation`] is a closed sum type: nine variants, each carrying only the
//! fields its rules read. The validator dispatches on it with one
//! exhaustive `match`, so adding a variant is a compile error everywhere it
//! matters.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::commitment::Commitment;
use crate::config::{
    ENGINE_VERSION, MAX_BUCKET_EXPONENT, MAX_DISCOUNT, NAMESPACE_LIFE_INFINITE, PRICE_BUCKET_COUNT,
};
use crate::crypto::Address;
use crate::error::RejectReason;

/// Hash of the off-chain data a name points at.
pub type ValueHash = [u8; 20];

// ---------------------------------------------------------------------------
// NamespaceParams
// ---------------------------------------------------------------------------

/// Pricing and lifetime rules a namespace fixes at reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceParams {
    /// Registration lifetime in blocks. [`NAMESPACE_LIFE_INFINITE`] means
    /// names never expire.
    pub lifetime: u32,
    /// Price multiplier.
    pub coeff: u8,
    /// Exponent base.
    pub base: u8,
    /// Price exponent per label length; the last bucket covers every
    /// longer label.
    pub buckets: [u8; PRICE_BUCKET_COUNT],
    /// Divisor for labels containing a digit, `-` or `_`.
    pub nonalpha_discount: u8,
    /// Divisor for labels without vowels.
    pub no_vowel_discount: u8,
}

impl NamespaceParams {
    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<(), RejectReason> {
        let invalid = |reason: String| RejectReason::InvalidNamespaceParams { reason };

        if self.lifetime == 0 {
            return Err(invalid("lifetime must be > 0".into()));
        }
        if let Some(b) = self.buckets.iter().find(|b| **b > MAX_BUCKET_EXPONENT) {
            return Err(invalid(format!(
                "bucket exponent {} exceeds {}",
                b, MAX_BUCKET_EXPONENT
            )));
        }
        for (label, d) in [
            ("nonalpha_discount", self.nonalpha_discount),
            ("no_vowel_discount", self.no_vowel_discount),
        ] {
            if d == 0 || d > MAX_DISCOUNT {
                return Err(invalid(format!(
                    "{} must be in 1..={}, got {}",
                    label, MAX_DISCOUNT, d
                )));
            }
        }
        Ok(())
    }

    /// Returns `true` if names in this namespace never expire.
    pub fn is_infinite(&self) -> bool {
        self.lifetime == NAMESPACE_LIFE_INFINITE
    }
}

// ---------------------------------------------------------------------------
// OpKind
// ---------------------------------------------------------------------------

/// Discriminant of an [`Operation`], for logging and outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    NamespacePreorder,
    NamespaceReveal,
    NamespaceReady,
    NamePreorder,
    NameRegister,
    NameUpdate,
    NameRenew,
    NameTransfer,
    NameRevoke,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NamespacePreorder => "namespace_preorder",
            Self::NamespaceReveal => "namespace_reveal",
            Self::NamespaceReady => "namespace_ready",
            Self::NamePreorder => "name_preorder",
            Self::NameRegister => "name_register",
            Self::NameUpdate => "name_update",
            Self::NameRenew => "name_renew",
            Self::NameTransfer => "name_transfer",
            Self::NameRevoke => "name_revoke",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A naming operation, before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Reserve a namespace id without disclosing it.
    NamespacePreorder { commitment: Commitment },
    /// Disclose a preordered namespace and fix its rules.
    NamespaceReveal {
        namespace_id: String,
        reveal_address: Address,
        params: NamespaceParams,
    },
    /// Open a revealed namespace for name operations.
    NamespaceReady { namespace_id: String },
    /// Reserve a name in a ready namespace without disclosing the label.
    NamePreorder {
        namespace_id: String,
        commitment: Commitment,
    },
    /// Claim a preordered name for `register_address`.
    NameRegister {
        name: String,
        register_address: Address,
    },
    /// Point a name at new data.
    NameUpdate { name: String, value_hash: ValueHash },
    /// Extend a name's registration.
    NameRenew { name: String },
    /// Hand a name to a new owner.
    NameTransfer {
        name: String,
        recipient: Address,
        keep_data: bool,
    },
    /// Permanently disable a name.
    NameRevoke { name: String },
}

impl Operation {
    /// Returns this operation's kind.
    pub fn kind(&self) -> OpKind {
        match self {
            Self::NamespacePreorder { .. } => OpKind::NamespacePreorder,
            Self::NamespaceReveal { .. } => OpKind::NamespaceReveal,
            Self::NamespaceReady { .. } => OpKind::NamespaceReady,
            Self::NamePreorder { .. } => OpKind::NamePreorder,
            Self::NameRegister { .. } => OpKind::NameRegister,
            Self::NameUpdate { .. } => OpKind::NameUpdate,
            Self::NameRenew { .. } => OpKind::NameRenew,
            Self::NameTransfer { .. } => OpKind::NameTransfer,
            Self::NameRevoke { .. } => OpKind::NameRevoke,
        }
    }

    /// The namespace id, name or commitment this operation targets.
    pub fn target(&self) -> String {
        match self {
            Self::NamespacePreorder { commitment } | Self::NamePreorder { commitment, .. } => {
                commitment.to_hex()
            }
            Self::NamespaceReveal { namespace_id, .. } | Self::NamespaceReady { namespace_id } => {
                namespace_id.clone()
            }
            Self::NameRegister { name, .. }
            | Self::NameUpdate { name, .. }
            | Self::NameRenew { name }
            | Self::NameTransfer { name, .. }
            | Self::NameRevoke { name } => name.clone(),
        }
    }

    /// Canonical bytes covered by the signer's signature.
    ///
    /// Deterministic concatenation: engine version, kind tag, variant fields,
    /// then the fee. Strings are null-terminated, integers little-endian.
    /// JSON is avoided because its field order is not a consensus rule.
    pub fn signable_bytes(&self, fee: u64) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
        push_str(&mut buf, &self.kind().to_string());

        match self {
            Self::NamespacePreorder { commitment } => {
                buf.extend_from_slice(commitment.as_bytes());
            }
            Self::NamespaceReveal {
                namespace_id,
                reveal_address,
                params,
            } => {
                push_str(&mut buf, namespace_id);
                push_str(&mut buf, reveal_address.as_str());
                buf.extend_from_slice(&params.lifetime.to_le_bytes());
                buf.push(params.coeff);
                buf.push(params.base);
                buf.extend_from_slice(&params.buckets);
                buf.push(params.nonalpha_discount);
                buf.push(params.no_vowel_discount);
            }
            Self::NamespaceReady { namespace_id } => push_str(&mut buf, namespace_id),
            Self::NamePreorder {
                namespace_id,
                commitment,
            } => {
                push_str(&mut buf, namespace_id);
                buf.extend_from_slice(commitment.as_bytes());
            }
            Self::NameRegister {
                name,
                register_address,
            } => {
                push_str(&mut buf, name);
                push_str(&mut buf, register_address.as_str());
            }
            Self::NameUpdate { name, value_hash } => {
                push_str(&mut buf, name);
                buf.extend_from_slice(value_hash);
            }
            Self::NameRenew { name } | Self::NameRevoke { name } => push_str(&mut buf, name),
            Self::NameTransfer {
                name,
                recipient,
                keep_data,
            } => {
                push_str(&mut buf, name);
                push_str(&mut buf, recipient.as_str());
                buf.push(u8::from(*keep_data));
            }
        }

        buf.extend_from_slice(&fee.to_le_bytes());
        buf
    }
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0x00);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> NamespaceParams {
        NamespaceParams {
            lifetime: 52_595,
            coeff: 250,
            base: 4,
            buckets: [6, 5, 4, 3, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            nonalpha_discount: 10,
            no_vowel_discount: 10,
        }
    }

    #[test]
    fn params_in_range_validate() {
        assert!(test_params().validate().is_ok());
    }

    #[test]
    fn params_out_of_range_rejected() {
        let mut p = test_params();
        p.buckets[3] = 16;
        assert!(p.validate().is_err());

        let mut p = test_params();
        p.no_vowel_discount = 0;
        assert!(p.validate().is_err());

        let mut p = test_params();
        p.lifetime = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn kind_display_is_snake_case() {
        let op = Operation::NameRevoke {
            name: "foo.test".into(),
        };
        assert_eq!(op.kind().to_string(), "name_revoke");
        assert_eq!(op.target(), "foo.test");
    }

    #[test]
    fn signable_bytes_cover_fee_and_fields() {
        let op = Operation::NameRenew {
            name: "foo.test".into(),
        };
        assert_ne!(op.signable_bytes(1), op.signable_bytes(2));

        let other = Operation::NameRevoke {
            name: "foo.test".into(),
        };
        assert_ne!(op.signable_bytes(1), other.signable_bytes(1));
    }

    #[test]
    fn transfer_keep_data_is_signed() {
        let recipient = Address::from_payload([4; 20]);
        let keep = Operation::NameTransfer {
            name: "foo.test".into(),
            recipient: recipient.clone(),
            keep_data: true,
        };
        let drop = Operation::NameTransfer {
            name: "foo.test".into(),
            recipient,
            keep_data: false,
        };
        assert_ne!(keep.signable_bytes(0), drop.signable_bytes(0));
    }

    #[test]
    fn operation_json_is_tagged() {
        let op = Operation::NamespaceReady {
            namespace_id: "test".into(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "namespace_ready");
        let back: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }
}
