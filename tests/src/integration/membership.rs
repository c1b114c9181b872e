//! Registry hygiene: dead peers leave, garbage connections are cut.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    use crate::converge;
    use crate::integration::support::{make_node, spawn_node};

    /// When one side shuts down, the other's registry empties: the read
    /// loop surfaces EOF, the peer is removed and closed exactly once.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_peer_departure_cleans_registry() {
        let a = make_node(44051, &[], false, Duration::from_secs(5));
        let b = make_node(44052, &[44051], false, Duration::from_secs(5));
        spawn_node(&a);
        spawn_node(&b);

        converge!(
            a.network().peer_count().await == 1 && b.network().peer_count().await == 1,
            "mutual handshake"
        );

        b.shutdown();
        converge!(a.network().peer_count().await == 0, "departure cleanup");
        assert_eq!(a.network().pending_count().await, 0);

        a.shutdown();
    }

    /// A connection that sends an implausible length prefix is dropped
    /// from the pending table without disturbing the node.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_garbage_frame_drops_pending_peer() {
        let node = make_node(44053, &[], false, Duration::from_secs(5));
        spawn_node(&node);

        // wait for the listener, then connect without handshaking
        let mut raw = loop {
            match TcpStream::connect("127.0.0.1:44053").await {
                Ok(stream) => break stream,
                Err(_) => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        };
        converge!(node.network().pending_count().await == 1, "pending registration");

        // a negative frame length is outside the accepted window
        raw.write_all(&(-1i64).to_le_bytes()).await.unwrap();
        converge!(node.network().pending_count().await == 0, "garbage cleanup");
        assert_eq!(node.network().peer_count().await, 0);

        // the node is still healthy: a real peer can join afterwards
        let late = make_node(44054, &[44053], false, Duration::from_secs(5));
        spawn_node(&late);
        converge!(node.network().peer_count().await == 1, "post-garbage handshake");

        node.shutdown();
        late.shutdown();
    }
}
