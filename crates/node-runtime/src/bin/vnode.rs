//! `fc-vnode` — a validator node.
//!
//! Listens for followers, collects gossiped transactions, and mints a
//! block every block interval. Runs until killed; all state is in memory.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fc_network::NetworkConfig;
use node_runtime::{Node, NodeConfig};
use shared_crypto::KeyPair;

#[derive(Debug, Parser)]
#[command(name = "fc-vnode", about = "Forge-Chain validator node")]
struct Args {
    /// Human-readable node name.
    #[arg(long, default_value = "VNODE")]
    name: String,

    /// TCP listen address.
    #[arg(long = "net-addr", default_value = ":3000")]
    net_addr: String,

    /// Interval between minted blocks, in milliseconds.
    #[arg(long = "block-time-ms", default_value_t = 5000)]
    block_time_ms: u64,

    /// Lower the log filter to debug.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let keypair = KeyPair::generate();
    let config = NodeConfig {
        network: NetworkConfig {
            name: args.name.clone(),
            listen_addr: args.net_addr.clone(),
            seed_nodes: Vec::new(),
        },
        validator: true,
        block_time: Duration::from_millis(args.block_time_ms),
    };
    info!(
        name = %config.network.name,
        addr = %config.network.listen_addr,
        block_time_ms = args.block_time_ms,
        "starting validator node"
    );

    let node = Node::new(keypair, config)?;
    let handle = node.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.shutdown();
        }
    });
    node.start().await?;
    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}
