//! Contract-state deltas across accepted blocks.

#[cfg(test)]
mod tests {
    use fc_chain::Blockchain;
    use shared_crypto::KeyPair;

    use crate::integration::support::{load_add_store_program, signed_tx, store_program};

    /// Block 1 seeds `foo <- 0`; block 2 loads it, adds 2, stores it back.
    /// The committed state ends at `le(2)`.
    #[test]
    fn test_contract_state_round_trip() {
        let chain = Blockchain::new().unwrap();
        let key = KeyPair::generate();

        chain
            .create_block(&key, vec![signed_tx(&store_program(b"foo", 0))])
            .unwrap();
        assert_eq!(
            chain.contract_value(b"foo"),
            Some(0u64.to_le_bytes().to_vec())
        );

        chain
            .create_block(&key, vec![signed_tx(&load_add_store_program(b"foo", 2))])
            .unwrap();
        assert_eq!(
            chain.contract_value(b"foo"),
            Some(2u64.to_le_bytes().to_vec())
        );
        assert_eq!(chain.height(), 2);
    }

    /// A block whose program reads an absent key is rejected whole, and
    /// the chain is untouched.
    #[test]
    fn test_missing_key_rejects_block() {
        let chain = Blockchain::new().unwrap();
        let key = KeyPair::generate();

        let err = chain
            .create_block(&key, vec![signed_tx(&load_add_store_program(b"absent", 1))])
            .unwrap_err();
        assert!(matches!(err, fc_chain::ChainError::Vm(_)));
        assert_eq!(chain.height(), 0);
        assert_eq!(chain.contract_value(b"absent"), None);
    }

    /// Opaque payloads execute as all-no-op programs and leave no delta.
    #[test]
    fn test_opaque_payload_leaves_state_alone() {
        let chain = Blockchain::new().unwrap();
        let key = KeyPair::generate();

        chain
            .create_block(&key, vec![signed_tx(b"just some ascii payload")])
            .unwrap();
        assert_eq!(chain.height(), 1);
        assert_eq!(chain.contract_value(b"just some ascii payload"), None);
    }
}
