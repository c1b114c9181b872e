//! # Transactions
//!
//! A transaction is an opaque byte payload (optionally a VM program) plus
//! the signature of whoever submitted it. Its identity is the digest of
//! its full deterministic encoding — payload and signature together — not
//! of the payload alone.

use serde::{Deserialize, Serialize};
use shared_crypto::{signature::verify_required, CryptoError, Hash, KeyPair, Signature};
use shared_types::{codec, EncodingError};

/// A signed, opaque chain payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The payload; executed as VM bytecode when its block is accepted.
    pub data: Vec<u8>,
    /// The submitter's signature over `data`.
    pub signature: Option<Signature>,
}

impl Transaction {
    /// An unsigned transaction over `data`.
    pub fn new(data: Vec<u8>) -> Transaction {
        Transaction {
            data,
            signature: None,
        }
    }

    /// Sign the payload, replacing any previous signature.
    pub fn sign(&mut self, key: &KeyPair) {
        self.signature = Some(key.sign(&self.data));
    }

    /// A transaction is valid iff its signature verifies against `data`.
    pub fn verify(&self) -> Result<(), CryptoError> {
        verify_required(self.signature.as_ref(), &self.data)
    }

    /// The digest of the entire encoded transaction.
    pub fn hash(&self) -> Result<Hash, EncodingError> {
        Ok(Hash::create(&codec::to_bytes(self)?))
    }
}
