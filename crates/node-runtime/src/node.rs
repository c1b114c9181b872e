//! # The Node
//!
//! One event loop owns the chain, the pool, and the broadcast logic. It
//! consumes the chain messages the network forwards, in arrival order,
//! processing each to completion:
//!
//! - `Tx` — verify into the pool, then re-broadcast excluding the sender.
//! - `Block` — append; `BlockKnown` is silence, `BlockTooHigh` starts the
//!   sync-by-fetch path, success re-broadcasts.
//! - `FetchBlocks` — answer with the requested range, directly.
//! - `FetchBlocksReply` — apply the range in order, abort on first error.
//!
//! No message from any peer may terminate the loop: every handler error
//! is logged with peer context and the loop continues. A validator node
//! additionally runs a ticker that snapshots the pool, mints a block
//! through the same validation path as received blocks, flushes the pool,
//! and broadcasts the result.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, error, info, warn};

use fc_chain::{Block, Blockchain, ChainError, Transaction, TxPool};
use fc_network::{Network, NetworkError};
use shared_crypto::KeyPair;
use shared_types::{codec, EncodingError, Message, MessageHeader, PeerId, RemoteMessage};

use crate::config::NodeConfig;
use crate::message::{FetchBlocks, FetchBlocksReply};

/// Errors surfaced by the per-message handlers.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Chain validation or application failed.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// A send or broadcast failed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A payload failed to decode.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// A full node: chain, pool, network, and the loops that drive them.
pub struct Node {
    id: PeerId,
    keypair: KeyPair,
    validator: bool,
    block_time: Duration,
    chain: Arc<Blockchain>,
    pool: Arc<TxPool>,
    network: Arc<Network>,
    message_rx: Mutex<Option<mpsc::UnboundedReceiver<RemoteMessage>>>,
    quit_tx: watch::Sender<bool>,
}

impl Node {
    /// Assemble a node from a keypair and its configuration.
    pub fn new(keypair: KeyPair, config: NodeConfig) -> Result<Arc<Node>, NodeError> {
        let (network, message_rx) = Network::new(&keypair, config.network)?;
        let (quit_tx, _) = watch::channel(false);
        Ok(Arc::new(Node {
            id: network.id().clone(),
            keypair,
            validator: config.validator,
            block_time: config.block_time,
            chain: Arc::new(Blockchain::new()?),
            pool: Arc::new(TxPool::new()),
            network,
            message_rx: Mutex::new(Some(message_rx)),
            quit_tx,
        }))
    }

    /// This node's network id.
    pub fn id(&self) -> &PeerId {
        &self.id
    }

    /// The chain this node maintains.
    pub fn chain(&self) -> &Arc<Blockchain> {
        &self.chain
    }

    /// The pending-transaction pool.
    pub fn pool(&self) -> &Arc<TxPool> {
        &self.pool
    }

    /// The network layer.
    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    /// Start the network, then run the event loop until shutdown.
    pub async fn start(self: &Arc<Self>) -> Result<(), NodeError> {
        self.network.start().await?;
        tokio::time::sleep(Duration::from_secs(1)).await;
        info!(id = %self.id, name = self.network.name(), "network started");

        if self.validator {
            let this = Arc::clone(self);
            tokio::spawn(async move { this.validator_loop().await });
            info!(block_time = ?self.block_time, "validator loop started");
        }

        let mut message_rx = self
            .message_rx
            .lock()
            .await
            .take()
            .expect("node started twice");
        let mut quit_rx = self.quit_tx.subscribe();

        loop {
            tokio::select! {
                Some(msg) = message_rx.recv() => {
                    let from = msg.from.clone();
                    if let Err(e) = self.handle_message(msg).await {
                        error!(peer = %from, error = %e, "handling chain message failed");
                    }
                }
                _ = quit_rx.changed() => break,
                else => break,
            }
        }

        self.shutdown_hook().await;
        Ok(())
    }

    /// Signal the event loop to stop.
    pub fn shutdown(&self) {
        let _ = self.quit_tx.send(true);
    }

    async fn shutdown_hook(&self) {
        info!(id = %self.id, "shutdown process starting");
        self.network.close().await;
    }

    /// Dispatch one chain message. Public so tests can inject messages
    /// exactly as the network would deliver them.
    pub async fn handle_message(self: &Arc<Self>, msg: RemoteMessage) -> Result<(), NodeError> {
        let message = msg.decode()?;
        match message.header {
            MessageHeader::Tx => self.process_transaction(&msg.from, message.data).await,
            MessageHeader::Block => self.process_block(&msg.from, message.data).await,
            MessageHeader::FetchBlocks => self.process_fetch(message.data).await,
            MessageHeader::FetchBlocksReply => self.process_fetch_reply(message.data).await,
            header => {
                warn!(peer = %msg.from, ?header, "network-layer header reached node loop");
                Ok(())
            }
        }
    }

    /// Admit a gossiped transaction and pass it on.
    async fn process_transaction(
        self: &Arc<Self>,
        from: &PeerId,
        data: Vec<u8>,
    ) -> Result<(), NodeError> {
        let tx: Transaction = codec::from_bytes(&data)?;
        let hash = tx.hash()?;
        // a transaction seen before is not re-admitted and, crucially, not
        // re-broadcast: the sender-exclusion below only stops one-hop echo
        if self.pool.contains(&tx)? {
            debug!(peer = %from, %hash, "transaction already pooled");
            return Ok(());
        }
        self.pool.add(tx)?;
        debug!(peer = %from, %hash, pool = self.pool.size(), "transaction admitted");

        // forward the exact bytes we received, excluding the sender
        let message = Message::from_raw(MessageHeader::Tx, data);
        let network = Arc::clone(&self.network);
        let sender = from.clone();
        tokio::spawn(async move {
            if let Err(e) = network.broadcast(&message, &sender).await {
                error!(error = %e, "transaction broadcast failed");
            }
        });
        Ok(())
    }

    /// Append a gossiped block, or fall into the sync path.
    async fn process_block(
        self: &Arc<Self>,
        from: &PeerId,
        data: Vec<u8>,
    ) -> Result<(), NodeError> {
        let block: Block = codec::from_bytes(&data)?;
        match self.chain.add_block(block) {
            Ok(()) => {
                info!(peer = %from, height = self.chain.height(), "block accepted");
                let message = Message::from_raw(MessageHeader::Block, data);
                let network = Arc::clone(&self.network);
                let sender = from.clone();
                tokio::spawn(async move {
                    if let Err(e) = network.broadcast(&message, &sender).await {
                        error!(error = %e, "block broadcast failed");
                    }
                });
                Ok(())
            }
            Err(ChainError::BlockKnown { height, .. }) => {
                debug!(peer = %from, height, "known block ignored");
                Ok(())
            }
            Err(ChainError::BlockTooHigh { height, current }) => {
                info!(peer = %from, height, current, "chain behind, fetching blocks");
                let this = Arc::clone(self);
                let peer = from.clone();
                tokio::spawn(async move {
                    if let Err(e) = this.fetch_blocks(&peer, current + 1, height).await {
                        error!(peer = %peer, error = %e, "block fetch failed");
                    }
                });
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Ask `peer` for the blocks in `from..=to`.
    async fn fetch_blocks(&self, peer: &PeerId, from: u32, to: u32) -> Result<(), NodeError> {
        let request = FetchBlocks {
            id: self.id.clone(),
            from,
            to,
        };
        let message = Message::new(MessageHeader::FetchBlocks, &request)?;
        self.network.send(peer, &message).await?;
        Ok(())
    }

    /// Answer a peer's fetch request with our blocks from `from` up to the
    /// current height.
    async fn process_fetch(&self, data: Vec<u8>) -> Result<(), NodeError> {
        let request: FetchBlocks = codec::from_bytes(&data)?;
        let blocks = self.chain.get_blocks(request.from);
        info!(
            peer = %request.id,
            from = request.from,
            count = blocks.len(),
            "answering block fetch"
        );
        let reply = Message::new(MessageHeader::FetchBlocksReply, &FetchBlocksReply { blocks })?;
        self.network.send(&request.id, &reply).await?;
        Ok(())
    }

    /// Apply a fetched block range in order; the first failure aborts.
    async fn process_fetch_reply(&self, data: Vec<u8>) -> Result<(), NodeError> {
        let reply: FetchBlocksReply = codec::from_bytes(&data)?;
        info!(count = reply.blocks.len(), "applying fetched blocks");
        for block in reply.blocks {
            self.chain.add_block(block)?;
        }
        info!(height = self.chain.height(), "chain synchronized");
        Ok(())
    }

    /// Mint one block from the current pool contents and broadcast it.
    ///
    /// The broadcast carries the empty local sender id, so every peer —
    /// including, via echoes, this validator — sees the block; echoes die
    /// as `BlockKnown`.
    pub async fn mint_block(self: &Arc<Self>) -> Result<(), NodeError> {
        let transactions = self.pool.transactions();
        let block = self.chain.create_block(&self.keypair, transactions)?;
        self.pool.flush();
        info!(
            height = block.header.height,
            txs = block.transactions.len(),
            "minted new block"
        );

        let message = Message::new(MessageHeader::Block, &block)?;
        self.network.broadcast(&message, &PeerId::local()).await?;
        Ok(())
    }

    async fn validator_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.block_time);
        let mut quit_rx = self.quit_tx.subscribe();
        // the first tick fires immediately; the first block waits a full interval
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.mint_block().await {
                        error!(error = %e, "minting block failed");
                    }
                }
                _ = quit_rx.changed() => break,
            }
        }
    }
}
