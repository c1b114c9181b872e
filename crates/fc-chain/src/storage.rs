//! # Height-Indexed Block Storage
//!
//! An append-only sequence of blocks indexed by height. The chain holds
//! the contiguity invariant (`[0..current_header.height]` with no gaps);
//! storage enforces it once more as a backstop so a misuse cannot corrupt
//! the sequence silently.

use parking_lot::RwLock;

use crate::block::Block;
use crate::errors::ChainError;

/// The narrow storage seam the blockchain appends through.
///
/// The node ships with the in-memory implementation below; nothing in the
/// chain core assumes anything beyond this trait.
pub trait Storage: Send + Sync {
    /// Append a block. The block's height must be exactly the next free
    /// slot; anything else is [`ChainError::NonContiguousHeight`].
    fn put(&self, block: Block) -> Result<(), ChainError>;

    /// The block at `height`, if stored.
    fn get(&self, height: u32) -> Option<Block>;

    /// The blocks in `from..=to`. Out-of-range ends are clamped;
    /// `from > to` yields the empty vector.
    fn get_range(&self, from: u32, to: u32) -> Vec<Block>;

    /// Number of stored blocks (genesis included).
    fn len(&self) -> usize;

    /// True when nothing is stored yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Vector-backed in-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blocks: RwLock<Vec<Block>>,
}

impl MemoryStorage {
    /// An empty store.
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn put(&self, block: Block) -> Result<(), ChainError> {
        let mut blocks = self.blocks.write();
        let expected = blocks.len() as u32;
        if block.header.height != expected {
            return Err(ChainError::NonContiguousHeight {
                expected,
                actual: block.header.height,
            });
        }
        blocks.push(block);
        Ok(())
    }

    fn get(&self, height: u32) -> Option<Block> {
        self.blocks.read().get(height as usize).cloned()
    }

    fn get_range(&self, from: u32, to: u32) -> Vec<Block> {
        if from > to {
            return Vec::new();
        }
        let blocks = self.blocks.read();
        let start = from as usize;
        if start >= blocks.len() {
            return Vec::new();
        }
        let end = (to as usize).min(blocks.len() - 1);
        blocks[start..=end].to_vec()
    }

    fn len(&self) -> usize {
        self.blocks.read().len()
    }
}
