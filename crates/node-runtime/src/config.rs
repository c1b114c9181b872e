//! # Node Configuration
//!
//! Runtime parameters for one node process. Everything has a sane default
//! so tests can override only what they exercise.

use std::time::Duration;

use fc_network::NetworkConfig;

/// Default interval between validator-minted blocks.
pub const DEFAULT_BLOCK_TIME: Duration = Duration::from_secs(5);

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Network layer configuration (name, listen address, seeds).
    pub network: NetworkConfig,
    /// Whether this node mints blocks.
    pub validator: bool,
    /// Interval between minted blocks when `validator` is set.
    pub block_time: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            validator: false,
            block_time: DEFAULT_BLOCK_TIME,
        }
    }
}
