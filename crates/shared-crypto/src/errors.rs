//! Error types for hashing and signature verification.

use thiserror::Error;

/// Failures of the self-describing hash format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Input too short to carry the `version || algorithm || length` prefix,
    /// or the declared digest length disagrees with the actual bytes.
    #[error("malformed hash")]
    MalformedHash,

    /// The algorithm byte is outside the registered table.
    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(u8),

    /// The version byte is not a known format version.
    #[error("unknown hash version: {0}")]
    UnknownHashVersion(u8),

    /// Recomputing the digest over the given input did not reproduce the hash.
    #[error("hash not verified")]
    HashNotVerified,
}

/// Failures of signature creation and verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Verification was attempted on data that carries no signature.
    #[error("no signature")]
    NoSignature,

    /// The signature does not verify against the given data.
    #[error("invalid signature")]
    InvalidSignature,

    /// The embedded compressed public key is not a valid curve point.
    #[error("invalid public key")]
    InvalidPublicKey,
}
