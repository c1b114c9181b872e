//! # Wire Message Envelope
//!
//! Every frame on a peer connection carries exactly one [`Message`]: a
//! one-byte header followed by an opaque, already-encoded payload. The
//! header taxonomy is closed — network-layer headers are consumed by the
//! network event loop, chain-layer headers are forwarded to the node loop
//! untouched, and the reserved band is logged and dropped.
//!
//! ## Header values
//!
//! | Value | Name | Payload |
//! |-------|------|---------|
//! | 0x01  | Handshake | id + listen address |
//! | 0x02  | HandshakeReply | id + listen address |
//! | 0x03–0x06 | Reserved | ignored |
//! | 0x08  | Tx | encoded transaction |
//! | 0x09  | Block | encoded block |
//! | 0x0A  | FetchBlocks | requester id + height range |
//! | 0x0B  | FetchBlocksReply | encoded block list |

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{self, EncodingError};

/// Identifier of a peer as seen by the local node.
///
/// Pre-handshake this is the remote socket address; post-handshake it is
/// the remote's self-declared network id (its keypair address). The peer
/// registries are keyed by this value, so the handshake promotion re-keys
/// a peer from one form to the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    /// The empty sender id used when a broadcast originates locally
    /// (validator-minted blocks) rather than from a peer.
    pub fn local() -> Self {
        PeerId(String::new())
    }

    /// String form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty local-origin id.
    pub fn is_local(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        PeerId(s)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        PeerId(s.to_string())
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The one-byte message discriminant.
///
/// Serialized as the bare byte value from the table above — not as a serde
/// enum tag — so the wire byte is exactly the protocol value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageHeader {
    /// Dialer announces its identity to the acceptor.
    Handshake = 0x01,
    /// Acceptor's answering identity; terminates the exchange.
    HandshakeReply = 0x02,
    /// Reserved band, kept so old peers' frames still parse.
    Reserved2 = 0x03,
    /// Reserved band.
    Reserved3 = 0x04,
    /// Reserved band.
    Reserved4 = 0x05,
    /// Reserved band.
    Reserved5 = 0x06,
    /// A signed transaction for the pool.
    Tx = 0x08,
    /// A full block for the chain.
    Block = 0x09,
    /// Request for a height range of blocks (sync recovery path).
    FetchBlocks = 0x0A,
    /// Answer to [`MessageHeader::FetchBlocks`].
    FetchBlocksReply = 0x0B,
}

impl MessageHeader {
    /// Map a wire byte back into the taxonomy.
    pub fn from_byte(byte: u8) -> Option<MessageHeader> {
        match byte {
            0x01 => Some(MessageHeader::Handshake),
            0x02 => Some(MessageHeader::HandshakeReply),
            0x03 => Some(MessageHeader::Reserved2),
            0x04 => Some(MessageHeader::Reserved3),
            0x05 => Some(MessageHeader::Reserved4),
            0x06 => Some(MessageHeader::Reserved5),
            0x08 => Some(MessageHeader::Tx),
            0x09 => Some(MessageHeader::Block),
            0x0A => Some(MessageHeader::FetchBlocks),
            0x0B => Some(MessageHeader::FetchBlocksReply),
            _ => None,
        }
    }

    /// True for the ignored reserved band (0x03–0x06).
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            MessageHeader::Reserved2
                | MessageHeader::Reserved3
                | MessageHeader::Reserved4
                | MessageHeader::Reserved5
        )
    }

    /// True for the headers the network layer consumes itself.
    pub fn is_network(self) -> bool {
        matches!(
            self,
            MessageHeader::Handshake | MessageHeader::HandshakeReply
        )
    }
}

impl Serialize for MessageHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for MessageHeader {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let byte = u8::deserialize(deserializer)?;
        MessageHeader::from_byte(byte)
            .ok_or_else(|| de::Error::custom(format!("unknown message header: 0x{byte:02X}")))
    }
}

/// The envelope carried inside every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Discriminant selecting the payload type.
    pub header: MessageHeader,
    /// The payload, already encoded with the object codec.
    pub data: Vec<u8>,
}

impl Message {
    /// Build an envelope by encoding `payload` with the object codec.
    pub fn new<T: Serialize>(header: MessageHeader, payload: &T) -> Result<Self, EncodingError> {
        Ok(Message {
            header,
            data: codec::to_bytes(payload)?,
        })
    }

    /// Wrap an already-encoded payload without re-encoding it.
    ///
    /// The gossip paths use this to forward the exact bytes they received.
    pub fn from_raw(header: MessageHeader, data: Vec<u8>) -> Self {
        Message { header, data }
    }

    /// Encode the whole envelope for framing onto the wire.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        codec::to_bytes(self)
    }
}

/// A frame read off one peer's connection, as delivered to the event loops.
#[derive(Debug, Clone)]
pub struct RemoteMessage {
    /// The reading peer's current id: socket address while pending,
    /// network id once handshaked.
    pub from: PeerId,
    /// The raw frame body (an encoded [`Message`]).
    pub payload: Vec<u8>,
}

impl RemoteMessage {
    /// Decode the frame body into its envelope.
    pub fn decode(&self) -> Result<Message, EncodingError> {
        codec::from_bytes(&self.payload)
    }
}
