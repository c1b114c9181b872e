//! Chain-layer message payloads carried inside the wire envelope.

use serde::{Deserialize, Serialize};

use fc_chain::Block;
use shared_types::PeerId;

/// Request for the blocks in `from..=to`, sent to the peer whose block
/// announcement ran ahead of the local chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchBlocks {
    /// The requester's network id; the reply is addressed to it.
    pub id: PeerId,
    /// First height wanted (the local `current + 1`).
    pub from: u32,
    /// Last height wanted (the announced block's height).
    pub to: u32,
}

/// The answering block range, in ascending height order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchBlocksReply {
    /// The requested blocks; applied in order, aborting on first error.
    pub blocks: Vec<Block>,
}
