//! # The Network
//!
//! Peer registry, handshake state machine, and message demux, all driven
//! by one event loop multiplexing three channels:
//!
//! - `add_peer` — fresh connections from the accept loop,
//! - `del_peer` — peers whose read loop died,
//! - `rpc_peer` — inbound frames from every read loop, in wire order.
//!
//! ## Handshake
//!
//! Both sides of a new connection hold a `Pending` peer keyed by the
//! other's socket address. The dialer waits a beat and sends
//! `Handshake { id, addr }`; the acceptor looks its pending entry up by
//! socket address, records the declared id, re-keys the peer into the
//! handshaked registry, and answers `HandshakeReply`; the dialer promotes
//! symmetrically and the exchange ends. A handshake from a socket with no
//! pending entry is dropped with `UnknownPendingPeer`.
//!
//! Chain-layer frames are forwarded to the node's channel untouched;
//! reserved headers are logged and dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, warn};

use shared_crypto::KeyPair;
use shared_types::{codec, Message, MessageHeader, PeerId, RemoteMessage};

use crate::errors::NetworkError;
use crate::peer::{read_loop, Peer};
use crate::transport::TcpTransport;

/// Pause before bootstrap dialing and before the dialer's handshake send,
/// giving the other side's event loop time to register the pending peer.
const STARTUP_GRACE: Duration = Duration::from_secs(1);

/// Static configuration of the network layer.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Human-readable node name (logs only).
    pub name: String,
    /// TCP listen address, `":3000"` or `"host:3000"`.
    pub listen_addr: String,
    /// Addresses dialed at startup.
    pub seed_nodes: Vec<String>,
}

impl NetworkConfig {
    /// Reject configurations that cannot produce a working node.
    fn validate(&self) -> Result<(), NetworkError> {
        if self.listen_addr.trim().is_empty() {
            return Err(NetworkError::InvalidConfig {
                reason: "listen address not specified".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "NODE".to_string(),
            listen_addr: ":3000".to_string(),
            seed_nodes: Vec::new(),
        }
    }
}

/// Identity payload of `Handshake` and `HandshakeReply` frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeData {
    /// The sender's network id (its keypair address, hex).
    pub id: String,
    /// The sender's advertised listen address.
    pub addr: String,
}

struct EventChannels {
    add_peer_rx: mpsc::Receiver<TcpStream>,
    del_peer_rx: mpsc::Receiver<Arc<Peer>>,
    rpc_rx: mpsc::UnboundedReceiver<RemoteMessage>,
}

/// The membership and gossip substrate one node runs on.
pub struct Network {
    id: PeerId,
    name: String,
    transport: TcpTransport,
    seed_nodes: Vec<String>,

    peers: RwLock<HashMap<PeerId, Arc<Peer>>>,
    pending_peers: RwLock<HashMap<PeerId, Arc<Peer>>>,

    add_peer_tx: mpsc::Sender<TcpStream>,
    del_peer_tx: mpsc::Sender<Arc<Peer>>,
    rpc_tx: mpsc::UnboundedSender<RemoteMessage>,
    message_tx: mpsc::UnboundedSender<RemoteMessage>,

    channels: parking_lot::Mutex<Option<EventChannels>>,
}

impl Network {
    /// Build a network whose id is the keypair's address.
    ///
    /// Returns the network and the receiving end of the forwarded-message
    /// channel the node loop consumes.
    pub fn new(
        keypair: &KeyPair,
        config: NetworkConfig,
    ) -> Result<(Arc<Network>, mpsc::UnboundedReceiver<RemoteMessage>), NetworkError> {
        config.validate()?;
        let (add_peer_tx, add_peer_rx) = mpsc::channel(64);
        let (del_peer_tx, del_peer_rx) = mpsc::channel(64);
        let (rpc_tx, rpc_rx) = mpsc::unbounded_channel();
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        let network = Arc::new(Network {
            id: PeerId::from(keypair.address().to_string()),
            name: config.name,
            transport: TcpTransport::new(config.listen_addr),
            seed_nodes: config.seed_nodes,
            peers: RwLock::new(HashMap::new()),
            pending_peers: RwLock::new(HashMap::new()),
            add_peer_tx,
            del_peer_tx,
            rpc_tx,
            message_tx,
            channels: parking_lot::Mutex::new(Some(EventChannels {
                add_peer_rx,
                del_peer_rx,
                rpc_rx,
            })),
        });
        Ok((network, message_rx))
    }

    /// This node's network id.
    pub fn id(&self) -> &PeerId {
        &self.id
    }

    /// This node's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The advertised listen address.
    pub fn listen_addr(&self) -> &str {
        self.transport.addr()
    }

    /// Start listening, run the event loop, and dial the seed nodes.
    pub async fn start(self: &Arc<Self>) -> Result<(), NetworkError> {
        let channels = self
            .channels
            .lock()
            .take()
            .expect("network started twice");
        self.transport.listen(self.add_peer_tx.clone()).await?;

        let this = Arc::clone(self);
        tokio::spawn(async move { this.event_loop(channels).await });

        // let the listener settle before anyone dials us back
        tokio::time::sleep(STARTUP_GRACE).await;
        self.bootstrap();
        Ok(())
    }

    /// Spawn a dial task per seed node.
    fn bootstrap(self: &Arc<Self>) {
        for addr in self.seed_nodes.clone() {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                match this.dial(&addr).await {
                    Ok(_) => info!(remote = %addr, "connected to seed node"),
                    Err(e) => error!(remote = %addr, error = %e, "seed dial failed"),
                }
            });
        }
    }

    /// Dial a remote node and open the handshake.
    ///
    /// Returns the remote socket address of the new connection.
    pub async fn dial(self: &Arc<Self>, addr: &str) -> Result<String, NetworkError> {
        let stream = TcpTransport::dial(addr).await?;
        let peer = self.register_peer(stream, true).await;

        debug!(remote = %addr, "waiting before sending handshake");
        tokio::time::sleep(STARTUP_GRACE).await;

        let handshake = Message::new(
            MessageHeader::Handshake,
            &HandshakeData {
                id: self.id.to_string(),
                addr: self.transport.addr().to_string(),
            },
        )?;
        peer.send(&handshake).await?;
        Ok(peer.addr().to_string())
    }

    /// Install a new connection as a pending peer and spawn its read loop.
    ///
    /// The pending-map insert happens before the read loop exists, so a
    /// handshake frame can never race past registration.
    async fn register_peer(&self, stream: TcpStream, outgoing: bool) -> Arc<Peer> {
        let (peer, reader) = Peer::new(stream, outgoing);
        let key = PeerId::from(peer.addr().to_string());
        {
            let mut pending = self.pending_peers.write().await;
            pending.insert(key, Arc::clone(&peer));
            info!(
                addr = %peer.addr(),
                pending = pending.len(),
                "peer joined"
            );
        }
        tokio::spawn(read_loop(
            Arc::clone(&peer),
            reader,
            self.rpc_tx.clone(),
            self.del_peer_tx.clone(),
        ));
        peer
    }

    async fn event_loop(self: Arc<Self>, mut channels: EventChannels) {
        loop {
            tokio::select! {
                Some(stream) = channels.add_peer_rx.recv() => {
                    self.register_peer(stream, false).await;
                }
                Some(peer) = channels.del_peer_rx.recv() => {
                    self.remove_peer(peer).await;
                }
                Some(rpc) = channels.rpc_rx.recv() => {
                    let from = rpc.from.clone();
                    if let Err(e) = self.handle_message(rpc).await {
                        warn!(peer = %from, error = %e, "handling inbound frame failed");
                    }
                }
                else => break,
            }
        }
    }

    /// Demux one inbound frame.
    ///
    /// Public so tests can drive the state machine without sockets.
    pub async fn handle_message(&self, rpc: RemoteMessage) -> Result<(), NetworkError> {
        let message = rpc.decode()?;
        match message.header {
            MessageHeader::Handshake => {
                info!(from = %rpc.from, "received handshake");
                self.process_handshake(rpc.from, &message.data, false).await
            }
            MessageHeader::HandshakeReply => {
                info!(from = %rpc.from, "received handshake reply");
                self.process_handshake(rpc.from, &message.data, true).await
            }
            header if header.is_reserved() => {
                warn!(from = %rpc.from, ?header, "unhandled reserved message");
                Ok(())
            }
            _ => {
                debug!(from = %rpc.from, "forwarding chain message to node");
                let _ = self.message_tx.send(rpc);
                Ok(())
            }
        }
    }

    /// Promote a pending peer on receipt of a handshake or its reply.
    async fn process_handshake(
        &self,
        from: PeerId,
        data: &[u8],
        reply: bool,
    ) -> Result<(), NetworkError> {
        let handshake: HandshakeData = codec::from_bytes(data)?;

        let peer = {
            let mut pending = self.pending_peers.write().await;
            let peer = pending
                .remove(&from)
                .ok_or_else(|| NetworkError::UnknownPendingPeer(from.clone()))?;
            debug!(pending = pending.len(), "pending peers");
            peer
        };

        peer.promote(PeerId::from(handshake.id.clone()));
        info!(peer = %peer.id(), addr = %peer.addr(), "peer handshaked");
        self.peers.write().await.insert(peer.id(), Arc::clone(&peer));

        if reply {
            info!(peer = %peer.id(), "full handshake established");
            return Ok(());
        }

        let answer = Message::new(
            MessageHeader::HandshakeReply,
            &HandshakeData {
                id: self.id.to_string(),
                addr: self.transport.addr().to_string(),
            },
        )?;
        peer.send(&answer).await
    }

    /// Close a dead peer and drop it from both registries.
    async fn remove_peer(&self, peer: Arc<Peer>) {
        if peer.mark_closed() {
            peer.shutdown().await;
        }
        self.peers.write().await.remove(&peer.id());
        self.pending_peers
            .write()
            .await
            .remove(&PeerId::from(peer.addr().to_string()));
        info!(peer = %peer.id(), addr = %peer.addr(), "peer closed");
    }

    /// Send one envelope to one handshaked peer.
    pub async fn send(&self, to: &PeerId, message: &Message) -> Result<(), NetworkError> {
        let peer = self
            .peers
            .read()
            .await
            .get(to)
            .cloned()
            .ok_or_else(|| NetworkError::UnknownPeer(to.clone()))?;
        peer.send(message).await
    }

    /// Fan an envelope out to every handshaked peer except `sender`.
    ///
    /// The envelope is encoded once; each write runs on its own task.
    /// Per-peer failures are logged and never abort the rest — there is no
    /// retry and no delivery guarantee.
    pub async fn broadcast(&self, message: &Message, sender: &PeerId) -> Result<(), NetworkError> {
        let bytes = message.encode()?;
        let targets: Vec<Arc<Peer>> = self
            .peers
            .read()
            .await
            .iter()
            .filter(|(id, _)| *id != sender)
            .map(|(_, peer)| Arc::clone(peer))
            .collect();

        for peer in targets {
            let bytes = bytes.clone();
            tokio::spawn(async move {
                if let Err(e) = peer.send_raw(&bytes).await {
                    error!(peer = %peer.id(), error = %e, "sending broadcast message failed");
                }
            });
        }
        Ok(())
    }

    /// Number of handshaked peers.
    pub async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }

    /// Number of peers still pending.
    pub async fn pending_count(&self) -> usize {
        self.pending_peers.read().await.len()
    }

    /// Ids of all handshaked peers.
    pub async fn peer_ids(&self) -> Vec<PeerId> {
        self.peers.read().await.keys().cloned().collect()
    }

    /// Stop accepting and tear down every peer.
    pub async fn close(&self) {
        info!(name = %self.name, "shutdown network");
        self.transport.close();
        let peers: Vec<Arc<Peer>> = self.peers.read().await.values().cloned().collect();
        for peer in peers {
            self.remove_peer(peer).await;
        }
    }
}
