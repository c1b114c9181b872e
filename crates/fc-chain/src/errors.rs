//! Error types for chain validation and contract execution.

use shared_crypto::{CryptoError, HashError};
use shared_types::EncodingError;
use thiserror::Error;

/// Errors surfaced by block validation, the pool, and storage.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The block's height is at or below the current header; the chain
    /// already has it. Silently tolerated by callers.
    #[error("block at height {height} already known (current {current})")]
    BlockKnown { height: u32, current: u32 },

    /// The block skips ahead of `current + 1`. Not a failure to the node:
    /// this is the signal that triggers the sync-by-fetch path.
    #[error("block at height {height} too high (current {current})")]
    BlockTooHigh { height: u32, current: u32 },

    /// The block's back-pointer does not match the current header's hash.
    #[error("previous block hash does not match current header")]
    BlockPrevHeaderInvalid,

    /// The header's data hash disagrees with the digest recomputed over
    /// the block's transactions.
    #[error("block data hash does not match its transactions")]
    InvalidDataHash,

    /// Storage backstop: an append that would leave a gap in the sequence.
    #[error("non-contiguous block height: expected {expected}, got {actual}")]
    NonContiguousHeight { expected: u32, actual: u32 },

    /// A signature was missing or failed to verify.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A self-describing hash failed to parse or verify.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// Encoding or decoding of a chain object failed.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Contract execution failed while applying a block.
    #[error(transparent)]
    Vm(#[from] VmError),
}

/// Errors raised by the bytecode interpreter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Push onto a full stack.
    #[error("stack overflow")]
    StackOverflow,

    /// Pop from an empty stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// A stack element could not be coerced to the type an instruction
    /// expects (see the integer coercion table in [`crate::vm`]).
    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    /// `LoadState` referenced a key absent from the contract state.
    #[error("state key missing: {key}")]
    StateKeyMissing { key: String },

    /// An operand-consuming opcode sat at instruction pointer 0, where no
    /// operand byte can precede it.
    #[error("opcode at ip {ip} has no operand byte")]
    MissingOperand { ip: usize },
}
