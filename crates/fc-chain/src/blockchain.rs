//! # The Blockchain
//!
//! Owns the block storage, the previous/current headers, and the contract
//! state, all behind one write lock so block application is strictly
//! serial. Constructed by installing the deterministic genesis block with
//! validation bypassed; every later block goes through the ordered
//! validation of [`Blockchain::add_block`].
//!
//! Contract execution is transactional per block: every transaction's
//! program runs first (later programs see earlier writes through an
//! overlay), and only when all of them succeed are the deltas merged and
//! the block appended. A single failing program rejects the whole block.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tracing::debug;

use shared_crypto::KeyPair;

use crate::block::{data_hash, Block, Header, HEADER_VERSION};
use crate::errors::ChainError;
use crate::state::State;
use crate::storage::{MemoryStorage, Storage};
use crate::transaction::Transaction;
use crate::vm::{OverlayState, Vm};

struct ChainInner {
    storage: Box<dyn Storage>,
    prev_header: Option<Header>,
    curr_header: Header,
    contract_state: State,
}

/// The replicated append-only ledger.
pub struct Blockchain {
    inner: RwLock<ChainInner>,
}

impl Blockchain {
    /// A chain holding only the genesis block.
    pub fn new() -> Result<Blockchain, ChainError> {
        let genesis = Block::genesis();
        let storage = MemoryStorage::new();
        let curr_header = genesis.header.clone();
        storage.put(genesis)?;
        Ok(Blockchain {
            inner: RwLock::new(ChainInner {
                storage: Box::new(storage),
                prev_header: None,
                curr_header,
                contract_state: State::new(),
            }),
        })
    }

    /// A copy of the current (tip) header.
    pub fn current_header(&self) -> Header {
        self.inner.read().curr_header.clone()
    }

    /// Height of the tip.
    pub fn height(&self) -> u32 {
        self.inner.read().curr_header.height
    }

    /// Mint, sign, validate, and append the next block. Validator-only.
    ///
    /// The freshly built block passes through the same validation as a
    /// block received from a peer, so a validator cannot mint anything its
    /// followers would reject.
    pub fn create_block(
        &self,
        key: &KeyPair,
        transactions: Vec<Transaction>,
    ) -> Result<Block, ChainError> {
        let curr = self.current_header();
        let header = Header {
            version: HEADER_VERSION,
            height: curr.height + 1,
            timestamp: unix_nanos(),
            prev_block_hash: curr.hash()?,
            data_hash: data_hash(&transactions)?,
        };
        let mut block = Block::new(header, transactions);
        block.sign(key)?;
        self.add_block(block.clone())?;
        Ok(block)
    }

    /// Validate and append a block received from a peer.
    pub fn add_block(&self, block: Block) -> Result<(), ChainError> {
        let mut inner = self.inner.write();
        inner.validate(&block)?;
        inner.apply(block)
    }

    /// The blocks from `from` through the current height, inclusive.
    ///
    /// This is the answer to a peer's fetch request.
    pub fn get_blocks(&self, from: u32) -> Vec<Block> {
        let inner = self.inner.read();
        inner.storage.get_range(from, inner.curr_header.height)
    }

    /// The block at `height`, if the chain has reached it.
    pub fn get_block(&self, height: u32) -> Option<Block> {
        self.inner.read().storage.get(height)
    }

    /// Read a key from the committed contract state.
    pub fn contract_value(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.inner.read().contract_state.get(key).cloned()
    }
}

impl ChainInner {
    /// Ordered validation; the first failure wins.
    fn validate(&self, block: &Block) -> Result<(), ChainError> {
        let current = self.curr_header.height;
        let height = block.header.height;

        if height <= current {
            return Err(ChainError::BlockKnown { height, current });
        }
        if height > current + 1 {
            return Err(ChainError::BlockTooHigh { height, current });
        }
        if block.header.prev_block_hash != self.curr_header.hash()? {
            return Err(ChainError::BlockPrevHeaderInvalid);
        }
        block.verify()
    }

    /// Execute every transaction, then commit deltas and append.
    fn apply(&mut self, block: Block) -> Result<(), ChainError> {
        let mut delta = State::new();
        for tx in &block.transactions {
            let tx_delta = {
                let view = OverlayState {
                    base: &self.contract_state,
                    overlay: &delta,
                };
                let mut vm = Vm::new(&tx.data, &view);
                vm.run()?;
                vm.into_delta()
            };
            delta.merge(tx_delta);
        }

        if !delta.is_empty() {
            debug!(
                height = block.header.height,
                keys = delta.len(),
                "merging contract state delta"
            );
        }
        self.contract_state.merge(delta);
        self.storage.put(block.clone())?;
        self.prev_header = Some(std::mem::replace(&mut self.curr_header, block.header));
        Ok(())
    }
}

/// Current wall-clock as unix nanoseconds.
fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or_default()
}
