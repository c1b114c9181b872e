//! # Forge-Chain Network
//!
//! The peer transport and membership layer:
//!
//! - [`transport`] — TCP listen/dial; every established connection is
//!   handed to the network's registrar.
//! - [`peer`] — one framed connection: length-prefixed writes behind a
//!   write mutex, a single read-loop task fanning frames into the event
//!   loop.
//! - [`network`] — the peer registries (pending by socket address,
//!   handshaked by network id), the two-phase handshake state machine,
//!   message demux, and broadcast/send-by-id.
//!
//! Frames carry the envelope from `shared-types`; the network consumes
//! the handshake headers itself and forwards everything else, unchanged,
//! to the node's message channel.

pub mod errors;
pub mod network;
pub mod peer;
pub mod transport;

pub use errors::NetworkError;
pub use network::{HandshakeData, Network, NetworkConfig};
pub use peer::{Peer, PeerState, MAX_FRAME_BYTES};
pub use transport::TcpTransport;
