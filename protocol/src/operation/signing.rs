//! Signed operations.
//!
//! Signing is separate from building an [`Operation`] because the key may
//! live elsewhere (hardware wallet, remote signer). The signature covers
//! [`Operation::signable_bytes`], which folds in the fee.

use serde::{Deserialize, Serialize};

use super::types::{OpKind, Operation};
use crate::crypto::hash::double_sha256;
use crate::crypto::{Address, Keypair, PublicKey, Signature};

/// An operation as it arrives in a block: payload, fee, signer and
/// signature.
///
/// The signature binds the payload and fee only, not any prior name
/// state, so the same signed operation stays valid wherever it is
/// included. Operation ids must be deduplicated by the layer that builds
/// blocks; the engine judges every copy afresh against current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedOperation {
    pub operation: Operation,
    /// Fee paid with this operation, in the smallest currency unit.
    pub fee: u64,
    pub sender_public_key: PublicKey,
    pub signature: Signature,
}

impl SignedOperation {
    /// Canonical bytes the signature covers.
    pub fn signable_bytes(&self) -> Vec<u8> {
        self.operation.signable_bytes(self.fee)
    }

    /// Raw operation id: `double_sha256(signable_bytes)`. Stable across
    /// re-signing with the same key and fee.
    pub fn id_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&double_sha256(&self.signable_bytes()));
        out
    }

    /// Hex form of [`id_bytes`](Self::id_bytes).
    pub fn id(&self) -> String {
        hex::encode(self.id_bytes())
    }

    pub fn kind(&self) -> OpKind {
        self.operation.kind()
    }

    /// Address the embedded public key controls. Claimed, not proven;
    /// call [`verify_signature`](Self::verify_signature) for that.
    pub fn sender_address(&self) -> Address {
        Address::from_public_key(&self.sender_public_key)
    }

    /// Returns `true` if the signature verifies against the embedded key.
    pub fn verify_signature(&self) -> bool {
        self.sender_public_key
            .verify(&self.signable_bytes(), &self.signature)
    }
}

/// Sign `operation` with `keypair`, paying `fee`.
///
/// # Example
///
/// ```
/// use bns_protocol::crypto::Keypair;
/// use bns_protocol::operation::{sign_operation, Operation};
///
/// let keypair = Keypair::generate();
/// let op = Operation::NameRenew { name: "foo.test".into() };
/// let signed = sign_operation(op, 6_400, &keypair);
/// assert!(signed.verify_signature());
/// ```
pub fn sign_operation(operation: Operation, fee: u64, keypair: &Keypair) -> SignedOperation {
    let signature = keypair.sign(&operation.signable_bytes(fee));
    SignedOperation {
        operation,
        fee,
        sender_public_key: keypair.public_key(),
        signature,
    }
}
