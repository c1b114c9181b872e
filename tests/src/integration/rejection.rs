//! A tampered signature is rejected at every layer it touches.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fc_chain::block::data_hash;
    use fc_chain::{Blockchain, ChainError, TxPool};
    use shared_crypto::{CryptoError, KeyPair};

    use crate::integration::support::{make_node, signed_tx, tx_message};

    /// Tampering a signed transaction's payload invalidates it for the
    /// verifier, the pool, the data-hash commitment, and the minting path.
    #[test]
    fn test_tampered_transaction_rejected_everywhere() {
        let mut tx = signed_tx(b"hello world");
        tx.data.push(1);

        // the verifier itself
        assert_eq!(tx.verify(), Err(CryptoError::InvalidSignature));

        // the pool
        let pool = TxPool::new();
        assert!(matches!(
            pool.add(tx.clone()),
            Err(ChainError::Crypto(CryptoError::InvalidSignature))
        ));
        assert_eq!(pool.size(), 0);

        // the data-hash commitment
        assert!(matches!(
            data_hash(&[tx.clone()]),
            Err(ChainError::Crypto(CryptoError::InvalidSignature))
        ));

        // block creation over a pool snapshot containing it
        let chain = Blockchain::new().unwrap();
        let key = KeyPair::generate();
        assert!(chain.create_block(&key, vec![tx]).is_err());
        assert_eq!(chain.height(), 0);
    }

    /// The node's wire-facing handler refuses the same transaction and
    /// leaves its pool untouched.
    #[tokio::test]
    async fn test_node_refuses_tampered_transaction() {
        let node = make_node(44041, &[], false, Duration::from_secs(5));

        let mut tx = signed_tx(b"hello world");
        tx.data.push(1);
        let err = node
            .handle_message(tx_message(&tx, &shared_types::PeerId::from("someone")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            node_runtime::NodeError::Chain(ChainError::Crypto(CryptoError::InvalidSignature))
        ));
        assert_eq!(node.pool().size(), 0);
    }

    /// An unsigned transaction is distinguishable from a tampered one.
    #[test]
    fn test_unsigned_transaction_rejected() {
        let tx = fc_chain::Transaction::new(b"hello world".to_vec());
        assert_eq!(tx.verify(), Err(CryptoError::NoSignature));

        let pool = TxPool::new();
        assert!(matches!(
            pool.add(tx),
            Err(ChainError::Crypto(CryptoError::NoSignature))
        ));
    }
}
