//! # Framed Peers
//!
//! A peer wraps one established TCP connection. Frames are
//! `length: i64 little-endian` followed by exactly that many bytes of an
//! encoded envelope. Writes are serialized through a mutex on the write
//! half; the read half is owned by a single read-loop task that fans
//! frames into the network's event loop.
//!
//! A peer starts `Pending` (identified by its socket address) and is
//! promoted to `Handshaked` (identified by the remote's declared network
//! id) when the network observes a valid handshake.
//!
//! Any read failure — EOF, socket error, or an implausible frame length —
//! terminates the read loop and deregisters the peer. After a partial
//! frame the stream offset is unknowable, so there is no resynchronizing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use shared_types::{Message, PeerId, RemoteMessage};

use crate::errors::NetworkError;

/// Upper bound on a single frame body; anything larger closes the peer.
pub const MAX_FRAME_BYTES: i64 = 16 * 1024 * 1024;

/// Where a peer stands in the membership protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerState {
    /// Transport established, identity unconfirmed.
    Pending,
    /// Identity confirmed by handshake.
    Handshaked(PeerId),
}

/// One connected peer.
pub struct Peer {
    addr: SocketAddr,
    outgoing: bool,
    state: RwLock<PeerState>,
    writer: Mutex<OwnedWriteHalf>,
    closed: AtomicBool,
}

impl Peer {
    /// Split a connection into a peer (owning the write half) and the
    /// read half its read loop will consume.
    pub fn new(stream: TcpStream, outgoing: bool) -> (Arc<Peer>, OwnedReadHalf) {
        let addr = stream
            .peer_addr()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 0)));
        let (reader, writer) = stream.into_split();
        let peer = Arc::new(Peer {
            addr,
            outgoing,
            state: RwLock::new(PeerState::Pending),
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        });
        (peer, reader)
    }

    /// The remote socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// True for connections this node dialed.
    pub fn is_outgoing(&self) -> bool {
        self.outgoing
    }

    /// The peer's current identity: network id once handshaked, socket
    /// address while pending.
    pub fn id(&self) -> PeerId {
        match &*self.state.read() {
            PeerState::Handshaked(id) => id.clone(),
            PeerState::Pending => PeerId::from(self.addr.to_string()),
        }
    }

    /// True once the handshake has completed.
    pub fn is_handshaked(&self) -> bool {
        matches!(&*self.state.read(), PeerState::Handshaked(_))
    }

    /// Record the remote's declared network id.
    pub fn promote(&self, id: PeerId) {
        *self.state.write() = PeerState::Handshaked(id);
    }

    /// Encode an envelope and write it as one frame.
    pub async fn send(&self, message: &Message) -> Result<(), NetworkError> {
        let bytes = message.encode()?;
        self.send_raw(&bytes).await
    }

    /// Frame pre-encoded envelope bytes onto the wire.
    ///
    /// Broadcast fan-out encodes the envelope once and calls this per
    /// peer. The write mutex keeps concurrent frames from interleaving.
    pub async fn send_raw(&self, bytes: &[u8]) -> Result<(), NetworkError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(&(bytes.len() as i64).to_le_bytes()).await?;
        writer.write_all(bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// First-closer check; true exactly once.
    pub fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    /// Shut the write half down, ending the connection.
    pub async fn shutdown(&self) {
        let mut writer = self.writer.lock().await;
        let _ = writer.shutdown().await;
    }
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("addr", &self.addr)
            .field("outgoing", &self.outgoing)
            .field("state", &*self.state.read())
            .finish()
    }
}

/// Read frames until the connection dies, then deregister.
///
/// Every frame becomes a [`RemoteMessage`] tagged with the peer's identity
/// at read time, delivered in wire order on `rpc_tx`. Exit always goes
/// through `del_tx` so the registrar removes and closes the peer.
pub async fn read_loop(
    peer: Arc<Peer>,
    mut reader: OwnedReadHalf,
    rpc_tx: mpsc::UnboundedSender<RemoteMessage>,
    del_tx: mpsc::Sender<Arc<Peer>>,
) {
    loop {
        let mut len_buf = [0u8; 8];
        match reader.read_exact(&mut len_buf).await {
            Ok(_) => {}
            Err(e) => {
                if e.kind() != std::io::ErrorKind::UnexpectedEof {
                    warn!(addr = %peer.addr(), error = %e, "reading frame length failed");
                }
                break;
            }
        }

        let len = i64::from_le_bytes(len_buf);
        if !(1..=MAX_FRAME_BYTES).contains(&len) {
            warn!(addr = %peer.addr(), len, "implausible frame length, closing peer");
            break;
        }

        let mut payload = vec![0u8; len as usize];
        match reader.read_exact(&mut payload).await {
            Ok(_) => {}
            Err(e) => {
                if e.kind() != std::io::ErrorKind::UnexpectedEof {
                    warn!(addr = %peer.addr(), error = %e, "reading frame body failed");
                }
                break;
            }
        }

        debug!(addr = %peer.addr(), bytes = len, "incoming frame accepted");
        let message = RemoteMessage {
            from: peer.id(),
            payload,
        };
        if rpc_tx.send(message).is_err() {
            break;
        }
    }

    let _ = del_tx.send(peer).await;
}
