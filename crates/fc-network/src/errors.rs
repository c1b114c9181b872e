//! Error types for the network layer.

use shared_types::{EncodingError, PeerId};
use thiserror::Error;

/// Failures of transport, framing, and peer addressing.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The network configuration cannot produce a working node.
    #[error("invalid network configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A send was addressed to an id absent from the handshaked registry.
    #[error("unknown peer: {0}")]
    UnknownPeer(PeerId),

    /// A handshake arrived from a socket address with no pending entry.
    #[error("handshaking failed with unknown pending peer: {0}")]
    UnknownPendingPeer(PeerId),

    /// An outbound dial did not complete within the dial timeout.
    #[error("dialing {addr} timed out")]
    DialTimeout { addr: String },

    /// A frame declared a length outside the accepted window.
    #[error("frame length {len} outside 1..={max}")]
    FrameTooLarge { len: i64, max: i64 },

    /// Envelope or payload encoding failed.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Socket-level failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
