//! # Transaction Pool
//!
//! The set of verified transactions waiting for inclusion in a block,
//! deduplicated by transaction hash and ordered by local arrival. The
//! dedup check, the signature gate, the arrival-order assignment, and the
//! insert happen inside one critical section so no two transactions can
//! ever share an order and a duplicate can never slip in between check
//! and insert.

use std::collections::{BTreeMap, HashSet};

use parking_lot::RwLock;

use crate::errors::ChainError;
use crate::transaction::Transaction;

#[derive(Debug, Default)]
struct PoolInner {
    /// Hash bytes of every pooled transaction.
    lookup: HashSet<Vec<u8>>,
    /// Transactions keyed by arrival order; iteration is ascending.
    items: BTreeMap<u64, Transaction>,
    /// Next arrival-order tag.
    next_order: u64,
}

/// A concurrent, hash-deduplicated, arrival-ordered transaction pool.
#[derive(Debug, Default)]
pub struct TxPool {
    inner: RwLock<PoolInner>,
}

impl TxPool {
    /// An empty pool.
    pub fn new() -> TxPool {
        TxPool::default()
    }

    /// Admit a transaction.
    ///
    /// Re-adding a pooled transaction is a no-op `Ok`. A new transaction
    /// must verify before it is inserted and tagged with the next arrival
    /// order.
    pub fn add(&self, tx: Transaction) -> Result<(), ChainError> {
        let hash = tx.hash()?;
        let mut inner = self.inner.write();
        if inner.lookup.contains(hash.as_bytes()) {
            return Ok(());
        }
        tx.verify()?;

        let order = inner.next_order;
        inner.next_order += 1;
        inner.lookup.insert(hash.as_bytes().to_vec());
        inner.items.insert(order, tx);
        Ok(())
    }

    /// True iff a transaction with the same hash is pooled.
    pub fn contains(&self, tx: &Transaction) -> Result<bool, ChainError> {
        let hash = tx.hash()?;
        Ok(self.inner.read().lookup.contains(hash.as_bytes()))
    }

    /// The pooled transactions in ascending arrival order.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.read().items.values().cloned().collect()
    }

    /// Number of pooled transactions.
    pub fn size(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Empty the pool. The arrival-order counter keeps counting so orders
    /// stay unique across flushes.
    pub fn flush(&self) {
        let mut inner = self.inner.write();
        inner.lookup.clear();
        inner.items.clear();
    }
}
