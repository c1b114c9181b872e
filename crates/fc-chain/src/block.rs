//! # Blocks and Headers
//!
//! A block's identity is the hash of its header; the proposer signs that
//! hash. The header's `data_hash` commits to the concatenated encodings of
//! the block's transactions, computed only after every transaction's own
//! signature has been verified — an unverifiable transaction can never be
//! committed to.

use serde::{Deserialize, Serialize};
use shared_crypto::{signature::verify_required, Hash, KeyPair, Signature};
use shared_types::{codec, EncodingError};

use crate::errors::ChainError;
use crate::transaction::Transaction;

/// Current block header version.
pub const HEADER_VERSION: u32 = 1;

/// Block metadata; the unit the chain actually links and signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Header format version.
    pub version: u32,
    /// Height in the chain; genesis is 0.
    pub height: u32,
    /// Proposer wall-clock, unix nanoseconds. Genesis pins this to 0 so
    /// every node constructs an identical genesis.
    pub timestamp: i64,
    /// Hash of the previous accepted header.
    pub prev_block_hash: Hash,
    /// Digest over the concatenated encoded transactions.
    pub data_hash: Hash,
}

impl Header {
    /// The header's digest — the block's identity.
    pub fn hash(&self) -> Result<Hash, EncodingError> {
        Ok(Hash::create(&codec::to_bytes(self)?))
    }
}

/// A header, its transactions, and the proposer's signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The signed metadata.
    pub header: Header,
    /// Payloads in application order.
    pub transactions: Vec<Transaction>,
    /// Proposer signature over `header.hash()`.
    pub signature: Option<Signature>,
}

impl Block {
    /// Assemble an unsigned block.
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Block {
        Block {
            header,
            transactions,
            signature: None,
        }
    }

    /// The deterministic height-0 block every node starts from.
    pub fn genesis() -> Block {
        Block::new(
            Header {
                version: HEADER_VERSION,
                height: 0,
                timestamp: 0,
                prev_block_hash: Hash::zero(),
                data_hash: Hash::zero(),
            },
            Vec::new(),
        )
    }

    /// The block's identity: its header hash.
    pub fn hash(&self) -> Result<Hash, EncodingError> {
        self.header.hash()
    }

    /// Sign the header hash as the block's proposer.
    pub fn sign(&mut self, key: &KeyPair) -> Result<(), ChainError> {
        let header_hash = self.header.hash()?;
        self.signature = Some(key.sign(header_hash.as_bytes()));
        Ok(())
    }

    /// Verify proposer signature and data-hash commitment.
    ///
    /// Not called for genesis — the chain installs it unvalidated.
    pub fn verify(&self) -> Result<(), ChainError> {
        let header_hash = self.header.hash()?;
        verify_required(self.signature.as_ref(), header_hash.as_bytes())?;

        let computed = data_hash(&self.transactions)?;
        if computed != self.header.data_hash {
            return Err(ChainError::InvalidDataHash);
        }
        Ok(())
    }
}

/// Digest of the concatenated encodings of `transactions`, in order.
///
/// Each transaction is signature-verified first; the digest of partially
/// invalid contents is never produced.
pub fn data_hash(transactions: &[Transaction]) -> Result<Hash, ChainError> {
    let mut buf = Vec::new();
    for tx in transactions {
        tx.verify()?;
        buf.extend_from_slice(&codec::to_bytes(tx)?);
    }
    Ok(Hash::create(&buf))
}
