//! Sync-by-fetch: a cold follower catches a chain that ran ahead.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shared_crypto::KeyPair;

    use crate::converge;
    use crate::integration::support::{make_node, spawn_node};

    /// V advances to height 5 in isolation. F then connects with an empty
    /// chain; when V broadcasts block 6, F sees it as too high, fetches
    /// the range, and ends at height 6 with V's exact tip.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_sync_by_fetch() {
        let v = make_node(44031, &[], false, Duration::from_secs(5));
        let f = make_node(44032, &[44031], false, Duration::from_secs(5));

        // V runs ahead before F exists on the network
        let key = KeyPair::generate();
        for _ in 0..5 {
            v.chain().create_block(&key, Vec::new()).unwrap();
        }
        assert_eq!(v.chain().height(), 5);
        assert_eq!(f.chain().height(), 0);

        spawn_node(&v);
        spawn_node(&f);
        converge!(
            v.network().peer_count().await == 1 && f.network().peer_count().await == 1,
            "late-joiner handshake"
        );

        // block 6 lands on F as BlockTooHigh and triggers the fetch
        v.mint_block().await.unwrap();
        assert_eq!(v.chain().height(), 6);

        converge!(f.chain().height() == 6, "fetch-based catch-up");
        assert_eq!(
            f.chain().current_header().hash().unwrap(),
            v.chain().current_header().hash().unwrap()
        );

        // every fetched block satisfies the linkage invariant
        for height in 1..=6u32 {
            let prev = f.chain().get_block(height - 1).unwrap();
            let block = f.chain().get_block(height).unwrap();
            assert_eq!(block.header.prev_block_hash, prev.header.hash().unwrap());
        }

        v.shutdown();
        f.shutdown();
    }
}
