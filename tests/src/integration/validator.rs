//! A validator mints; a follower converges on the same chain.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::converge;
    use crate::integration::support::{make_node, signed_tx, spawn_node, tx_message};

    /// V mints on a one-second interval; F (seeded off V) ends up with
    /// V's exact blocks, transactions included.
    #[tokio::test(flavor = "multi_thread")]
    async fn test_validator_emits_block_to_follower() {
        let v = make_node(44021, &[], true, Duration::from_secs(1));
        let f = make_node(44022, &[44021], false, Duration::from_secs(1));
        spawn_node(&v);
        spawn_node(&f);

        converge!(
            v.network().peer_count().await == 1 && f.network().peer_count().await == 1,
            "validator/follower handshake"
        );

        // hand the validator three signed transactions
        for i in 0..3u8 {
            let tx = signed_tx(format!("payload {i}").as_bytes());
            v.handle_message(tx_message(&tx, v.id())).await.unwrap();
        }
        assert!(v.pool().size() <= 3);

        converge!(
            v.chain().height() >= 1 && f.chain().height() >= 1,
            "both chains past genesis"
        );

        // the follower's block 1 is byte-identical to the validator's
        let v_block = v.chain().get_block(1).unwrap();
        let f_block = f.chain().get_block(1).unwrap();
        assert_eq!(
            v_block.hash().unwrap(),
            f_block.hash().unwrap()
        );
        assert_eq!(v_block.transactions, f_block.transactions);

        // minting flushed the pool
        converge!(v.pool().size() == 0, "validator pool flush");

        v.shutdown();
        f.shutdown();
    }
}
