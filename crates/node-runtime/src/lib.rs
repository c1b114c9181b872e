//! # Forge-Chain Node Runtime
//!
//! Ties the chain core to the network layer: the [`node::Node`] event loop
//! ingests the chain messages the network forwards, drives the pool and
//! the blockchain, answers fetch requests, and — when configured as a
//! validator — mints a block every block interval.

pub mod config;
pub mod message;
pub mod node;

pub use config::NodeConfig;
pub use message::{FetchBlocks, FetchBlocksReply};
pub use node::{Node, NodeError};
