//! # Forge-Chain Shared Types
//!
//! The two contracts every other crate builds on:
//!
//! - [`codec`] — the single deterministic binary encoding used for all
//!   on-chain and on-wire data (fixed-width little-endian integers,
//!   length-prefixed byte strings).
//! - [`envelope`] — the typed wire message envelope and its header
//!   taxonomy, plus the [`RemoteMessage`](envelope::RemoteMessage) unit
//!   that peer read loops feed into the event loops.

pub mod codec;
pub mod envelope;

pub use codec::EncodingError;
pub use envelope::{Message, MessageHeader, PeerId, RemoteMessage};
