//! # Self-Describing Digests
//!
//! A hash is `version(1) || algorithm(1) || length(1) || digest(length)`.
//! The prefix travels with the digest, so verification never needs
//! out-of-band agreement on the algorithm: it re-reads version and
//! algorithm from the hash itself and recomputes.
//!
//! The current format version is `1`; the default algorithm is SHA2-256.
//! The distinguished zero hash is the digest of the single byte `{0}` and
//! anchors the genesis block's back-pointer.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::errors::HashError;

/// Current hash format version.
pub const HASH_VERSION: u8 = 1;

/// Registered digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HashAlgorithm {
    /// SHA-1 (legacy, never produced by default).
    Sha1 = 1,
    /// SHA2-256, the default.
    Sha2_256 = 2,
    /// SHA2-512.
    Sha2_512 = 3,
}

impl HashAlgorithm {
    /// Map an algorithm byte back into the table.
    pub fn from_byte(byte: u8) -> Result<Self, HashError> {
        match byte {
            1 => Ok(HashAlgorithm::Sha1),
            2 => Ok(HashAlgorithm::Sha2_256),
            3 => Ok(HashAlgorithm::Sha2_512),
            other => Err(HashError::UnknownHashAlgorithm(other)),
        }
    }

    /// Compute this algorithm's raw digest of `data`.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            HashAlgorithm::Sha2_256 => Sha256::digest(data).to_vec(),
            HashAlgorithm::Sha2_512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// A self-describing digest value.
///
/// Equality is plain byte equality over the whole
/// `version || algorithm || length || digest` string. Hashes are values:
/// cheap to clone, safe to send anywhere.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash(Vec<u8>);

impl Hash {
    /// Hash `data` with the default algorithm (SHA2-256).
    pub fn create(data: &[u8]) -> Hash {
        Hash::create_with(HashAlgorithm::Sha2_256, data)
    }

    /// Hash `data` with an explicit algorithm.
    pub fn create_with(algorithm: HashAlgorithm, data: &[u8]) -> Hash {
        let digest = algorithm.digest(data);
        let mut bytes = Vec::with_capacity(3 + digest.len());
        bytes.push(HASH_VERSION);
        bytes.push(algorithm as u8);
        bytes.push(digest.len() as u8);
        bytes.extend_from_slice(&digest);
        Hash(bytes)
    }

    /// The distinguished zero hash: the default digest of the byte `{0}`.
    pub fn zero() -> Hash {
        Hash::create(&[0u8])
    }

    /// True iff this is [`Hash::zero`].
    pub fn is_zero(&self) -> bool {
        *self == Hash::zero()
    }

    /// The full self-describing byte string.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Adopt raw bytes after validating the prefix and declared length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Hash, HashError> {
        let (_, _) = Hash::decode_prefix(&bytes)?;
        Ok(Hash(bytes))
    }

    /// Parse the lowercase-hex rendering produced by `Display`.
    pub fn from_hex(s: &str) -> Result<Hash, HashError> {
        let bytes = hex::decode(s).map_err(|_| HashError::MalformedHash)?;
        Hash::from_bytes(bytes)
    }

    /// The algorithm this hash declares for itself.
    pub fn algorithm(&self) -> Result<HashAlgorithm, HashError> {
        let (_, algorithm) = Hash::decode_prefix(&self.0)?;
        Ok(algorithm)
    }

    /// Recompute the digest of `data` using the version and algorithm read
    /// from this hash's own prefix, and compare byte-for-byte.
    pub fn verify(&self, data: &[u8]) -> Result<(), HashError> {
        let (_, algorithm) = Hash::decode_prefix(&self.0)?;
        let other = Hash::create_with(algorithm, data);
        if *self != other {
            return Err(HashError::HashNotVerified);
        }
        Ok(())
    }

    fn decode_prefix(bytes: &[u8]) -> Result<(u8, HashAlgorithm), HashError> {
        if bytes.len() < 3 {
            return Err(HashError::MalformedHash);
        }
        let version = bytes[0];
        if version != HASH_VERSION {
            return Err(HashError::UnknownHashVersion(version));
        }
        let algorithm = HashAlgorithm::from_byte(bytes[1])?;
        if bytes.len() != 3 + bytes[2] as usize {
            return Err(HashError::MalformedHash);
        }
        Ok((version, algorithm))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}
