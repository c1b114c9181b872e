//! # Forge-Chain Chain Core
//!
//! The ledger half of the node: the block/transaction data model, the
//! in-memory height-indexed storage, the deduplicated transaction pool,
//! the contract key/value state, the stack-bytecode VM that mutates it,
//! and the [`Blockchain`] that ties them together behind one write lock.
//!
//! ## Block lifecycle
//!
//! A block enters through [`Blockchain::add_block`] (received from a peer)
//! or [`Blockchain::create_block`] (minted by a validator). Validation is
//! ordered: known height, too-high height, previous-header linkage, then
//! the block's own signature and data hash. On acceptance every
//! transaction's payload is executed by the [`vm::Vm`] and the resulting
//! deltas are merged into the contract state — all of them, or none.

pub mod block;
pub mod blockchain;
pub mod errors;
pub mod state;
pub mod storage;
pub mod transaction;
pub mod txpool;
pub mod vm;

pub use block::{data_hash, Block, Header, HEADER_VERSION};
pub use blockchain::Blockchain;
pub use errors::{ChainError, VmError};
pub use state::State;
pub use storage::{MemoryStorage, Storage};
pub use transaction::Transaction;
pub use txpool::TxPool;
pub use vm::Vm;
