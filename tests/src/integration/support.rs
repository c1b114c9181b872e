//! Fixtures shared by the integration scenarios.

use std::sync::Arc;
use std::time::Duration;

use fc_chain::Transaction;
use fc_network::NetworkConfig;
use node_runtime::{Node, NodeConfig};
use shared_crypto::KeyPair;
use shared_types::{Message, MessageHeader, PeerId, RemoteMessage};

/// How long multi-node scenarios may take to converge. The protocol's own
/// startup sleeps (listener grace + pre-handshake grace) already account
/// for ~2s of that.
pub const CONVERGE_TIMEOUT: Duration = Duration::from_secs(8);

/// Poll interval while waiting for convergence.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Build a node listening on `127.0.0.1:port` with the given seeds.
pub fn make_node(port: u16, seeds: &[u16], validator: bool, block_time: Duration) -> Arc<Node> {
    let config = NodeConfig {
        network: NetworkConfig {
            name: format!("NODE_{port}"),
            listen_addr: format!("127.0.0.1:{port}"),
            seed_nodes: seeds
                .iter()
                .map(|seed| format!("127.0.0.1:{seed}"))
                .collect(),
        },
        validator,
        block_time,
    };
    Node::new(KeyPair::generate(), config).expect("node construction failed")
}

/// Spawn a node's event loop in the background.
pub fn spawn_node(node: &Arc<Node>) {
    let node = Arc::clone(node);
    tokio::spawn(async move {
        let _ = node.start().await;
    });
}

/// A freshly signed transaction over `data`.
pub fn signed_tx(data: &[u8]) -> Transaction {
    let mut tx = Transaction::new(data.to_vec());
    tx.sign(&KeyPair::generate());
    tx
}

/// Wrap a transaction the way the wire would deliver it from `from`.
pub fn tx_message(tx: &Transaction, from: &PeerId) -> RemoteMessage {
    let message = Message::new(MessageHeader::Tx, tx).expect("encode transaction");
    RemoteMessage {
        from: from.clone(),
        payload: message.encode().expect("encode envelope"),
    }
}

/// VM program storing `key <- value` into contract state.
pub fn store_program(key: &[u8], value: u8) -> Vec<u8> {
    let mut program = pack_key_fragment(key);
    program.extend_from_slice(&[value, 0x0A, 0x0E]);
    program
}

/// VM program loading `key`, adding `n`, and storing the result back.
pub fn load_add_store_program(key: &[u8], n: u8) -> Vec<u8> {
    let mut program = pack_key_fragment(key);
    let mut load = pack_key_fragment(key);
    load.pop();
    load.push(0x0F);
    program.extend_from_slice(&load);
    program.extend_from_slice(&[n, 0x0A, 0x12, 0x0E]);
    program
}

fn pack_key_fragment(key: &[u8]) -> Vec<u8> {
    let mut program = vec![key.len() as u8, 0x0C];
    for byte in key {
        program.push(*byte);
        program.push(0x0B);
    }
    program.push(0x0D);
    program
}

/// Wait until `cond` holds or the convergence deadline passes.
#[macro_export]
macro_rules! converge {
    ($cond:expr, $what:expr) => {{
        let deadline = ::std::time::Instant::now() + $crate::integration::support::CONVERGE_TIMEOUT;
        loop {
            if $cond {
                break;
            }
            assert!(
                ::std::time::Instant::now() < deadline,
                "timed out waiting for {}",
                $what
            );
            ::tokio::time::sleep($crate::integration::support::POLL_INTERVAL).await;
        }
    }};
}
