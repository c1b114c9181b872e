//! # Self-Contained Signatures
//!
//! A signature carries its `r` and `s` scalars plus the signer's compressed
//! public key, so any holder can verify it without a key registry. The
//! scalar components are variable-length byte strings and get a length
//! prefix from the object codec.

use p256::ecdsa::{signature::Verifier, Signature as EcdsaSignature, VerifyingKey};
use p256::FieldBytes;
use serde::{Deserialize, Serialize};

use crate::errors::CryptoError;

/// An ECDSA P-256 signature with its embedded compressed public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    r: Vec<u8>,
    s: Vec<u8>,
    pubkey: Vec<u8>,
}

impl Signature {
    /// Assemble a signature from its raw components.
    pub fn new(r: Vec<u8>, s: Vec<u8>, pubkey: Vec<u8>) -> Signature {
        Signature { r, s, pubkey }
    }

    /// The signer's SEC1-compressed public key.
    pub fn public_key_bytes(&self) -> &[u8] {
        &self.pubkey
    }

    /// Verify this signature against `data`.
    ///
    /// The verifying key is recovered from the embedded compressed point;
    /// a key that is not on the curve fails with
    /// [`CryptoError::InvalidPublicKey`], everything else that does not
    /// check out fails with [`CryptoError::InvalidSignature`].
    pub fn verify(&self, data: &[u8]) -> Result<(), CryptoError> {
        let verifying_key = VerifyingKey::from_sec1_bytes(&self.pubkey)
            .map_err(|_| CryptoError::InvalidPublicKey)?;

        if self.r.len() != 32 || self.s.len() != 32 {
            return Err(CryptoError::InvalidSignature);
        }
        let r = FieldBytes::clone_from_slice(&self.r);
        let s = FieldBytes::clone_from_slice(&self.s);
        let signature = EcdsaSignature::from_scalars(r, s)
            .map_err(|_| CryptoError::InvalidSignature)?;

        verifying_key
            .verify(data, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

/// Verify an optional signature slot.
///
/// `None` is the distinguished [`CryptoError::NoSignature`] failure; this
/// is the one place that rule lives, so transactions and blocks cannot
/// disagree about it.
pub fn verify_required(
    signature: Option<&Signature>,
    data: &[u8],
) -> Result<(), CryptoError> {
    match signature {
        Some(signature) => signature.verify(data),
        None => Err(CryptoError::NoSignature),
    }
}
