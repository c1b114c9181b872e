//! # Deterministic Object Codec
//!
//! A thin wrapper around bincode pinned to one configuration: fixed-width
//! little-endian integers, `u64` length prefixes for variable-size fields,
//! and rejection of trailing bytes on decode.
//!
//! Every `Header`, `Block`, `Transaction`, wire `Message`, and message
//! payload crosses process boundaries through these two functions, so the
//! configuration here *is* the wire format. Encode/decode must remain a
//! round-trip bijection for all of them.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors produced by the codec.
///
/// Truncated input, trailing garbage, malformed tags, and the underlying
/// reader/writer failures all collapse into these two variants; callers
/// never need to distinguish bincode internals.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Serialization failed.
    #[error("encoding failed: {reason}")]
    Encode { reason: String },

    /// Deserialization failed (truncation, malformed tag, trailing bytes).
    #[error("decoding failed: {reason}")]
    Decode { reason: String },

    /// A message header byte outside the defined taxonomy.
    #[error("unknown message header: 0x{0:02X}")]
    UnknownHeader(u8),
}

/// The pinned bincode configuration.
///
/// `with_fixint_encoding` keeps every integer at its natural width in
/// little-endian order; the default trailing-byte rejection turns garbage
/// after a valid object into a decode error instead of silent acceptance.
fn options() -> impl Options {
    bincode::options().with_fixint_encoding().with_little_endian()
}

/// Encode a value into its deterministic byte representation.
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodingError> {
    options().serialize(value).map_err(|e| EncodingError::Encode {
        reason: e.to_string(),
    })
}

/// Decode a value from bytes produced by [`to_bytes`].
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, EncodingError> {
    options().deserialize(bytes).map_err(|e| EncodingError::Decode {
        reason: e.to_string(),
    })
}
