//! Block gossip on the happy path: sequential heights, tolerated echoes.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_types::{Message, MessageHeader, RemoteMessage};

    use crate::converge;
    use crate::integration::support::{make_node, signed_tx, spawn_node};

    /// Blocks minted one at a time arrive at a connected follower in
    /// height order; no fetch is ever needed.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_sequential_blocks_follow_without_fetch() {
        let v = make_node(44061, &[], false, Duration::from_secs(5));
        let f = make_node(44062, &[44061], false, Duration::from_secs(5));
        spawn_node(&v);
        spawn_node(&f);

        converge!(
            v.network().peer_count().await == 1 && f.network().peer_count().await == 1,
            "handshake"
        );

        for expected in 1..=3u32 {
            v.pool()
                .add(signed_tx(format!("block {expected} payload").as_bytes()))
                .unwrap();
            v.mint_block().await.unwrap();
            assert_eq!(v.chain().height(), expected);
            converge!(f.chain().height() == expected, "follower keeps pace");
        }

        assert_eq!(
            f.chain().current_header().hash().unwrap(),
            v.chain().current_header().hash().unwrap()
        );

        v.shutdown();
        f.shutdown();
    }

    /// A block echoed back to its origin dies as `BlockKnown` without
    /// disturbing the chain or the loop.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_block_echo_tolerated() {
        let v = make_node(44063, &[], false, Duration::from_secs(5));
        spawn_node(&v);
        v.mint_block().await.unwrap();

        let block = v.chain().get_block(1).unwrap();
        let message = Message::new(MessageHeader::Block, &block).unwrap();
        let echo = RemoteMessage {
            from: shared_types::PeerId::from("some-peer"),
            payload: message.encode().unwrap(),
        };

        v.handle_message(echo).await.unwrap();
        assert_eq!(v.chain().height(), 1);

        v.shutdown();
    }
}
