//! # P-256 Keypairs
//!
//! The node identity and block-proposer key: an ECDSA signing key over the
//! NIST P-256 curve. Signatures embed the compressed public key so that
//! verification is self-contained.

use p256::ecdsa::{signature::RandomizedSigner, Signature as EcdsaSignature, SigningKey};
use zeroize::Zeroize;

use crate::address::Address;
use crate::signature::Signature;

/// An ECDSA keypair over NIST P-256.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh keypair from the system RNG.
    pub fn generate() -> KeyPair {
        KeyPair {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// The SEC1-compressed public key (33 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// The 20-byte address derived from the compressed public key.
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key_bytes())
    }

    /// Sign raw bytes, producing a self-contained [`Signature`].
    ///
    /// The nonce is drawn from the system RNG, so signing the same payload
    /// twice yields two distinct signatures.
    pub fn sign(&self, data: &[u8]) -> Signature {
        let signature: EcdsaSignature = self
            .signing_key
            .sign_with_rng(&mut rand::thread_rng(), data);
        let (r, s) = signature.split_bytes();
        Signature::new(r.to_vec(), s.to_vec(), self.public_key_bytes())
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never render key material.
        write!(f, "KeyPair({})", self.address())
    }
}
