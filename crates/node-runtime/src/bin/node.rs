//! `fc-node` — a gossiping follower node.
//!
//! `--seq N` derives the listen address `:300N` and the name `NODE_N`;
//! `--node` points at a seed to bootstrap from. Runs until killed; all
//! state is in memory.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use fc_network::NetworkConfig;
use node_runtime::{Node, NodeConfig};
use shared_crypto::KeyPair;

#[derive(Debug, Parser)]
#[command(name = "fc-node", about = "Forge-Chain follower node")]
struct Args {
    /// Node sequence number; listen address becomes :300<seq>.
    #[arg(long, default_value = "1")]
    seq: String,

    /// Seed node address to bootstrap from.
    #[arg(long, default_value = ":3000")]
    node: String,

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
            name: format!("NODE_{}", args.seq),
            listen_addr: format!(":300{}", args.seq),
            seed_nodes: vec![args.node.clone()],
        },
        ..NodeConfig::default()
    };
    info!(
        name = %config.network.name,
        addr = %config.network.listen_addr,
        seed = %args.node,
        "starting follower node"
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
