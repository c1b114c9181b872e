//! # Forge-Chain Shared Crypto
//!
//! Cryptographic primitives for the chain:
//!
//! - [`digest`] — the self-describing hash format
//!   (`version || algorithm || length || digest`).
//! - [`keypair`] — NIST P-256 keypairs: generation, signing, address
//!   derivation.
//! - [`signature`] — `(r, s, compressed pubkey)` signatures with
//!   embedded-point verification.
//! - [`address`] — the 20-byte node/account identifier derived from a
//!   compressed public key.

pub mod address;
pub mod digest;
pub mod errors;
pub mod keypair;
pub mod signature;

pub use address::Address;
pub use digest::{Hash, HashAlgorithm};
pub use errors::{CryptoError, HashError};
pub use keypair::KeyPair;
pub use signature::Signature;
