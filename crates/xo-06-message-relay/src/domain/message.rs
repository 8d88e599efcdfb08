//! # Cross-Chain Messages

use serde::{Deserialize, Serialize};
use shared_crypto::{keccak256, message_hash, CrossChainMessageRef};
use shared_types::{Address, Amount, ChainId, Hash};

/// A message as fulfilled on its destination chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainMessage {
    /// Sender-side nonce.
    pub nonce: u64,
    /// Opaque payload, non-empty.
    pub payload: Vec<u8>,
    /// Destination handler.
    pub endpoint: Address,
    /// Originating chain.
    pub src_chain_id: ChainId,
    /// Chain that must fulfill it.
    pub dst_chain_id: ChainId,
    /// Identifier of the send on the originating chain.
    pub src_tx_hash: Hash,
}

impl CrossChainMessage {
    /// Borrowed view used by the hash encoder.
    pub fn view(&self) -> CrossChainMessageRef<'_> {
        CrossChainMessageRef {
            nonce: self.nonce,
            payload: &self.payload,
            endpoint: &self.endpoint,
            src_chain_id: self.src_chain_id,
            dst_chain_id: self.dst_chain_id,
            src_tx_hash: &self.src_tx_hash,
        }
    }

    /// Replay-protection key; what signers attest to.
    pub fn hash(&self) -> Hash {
        message_hash(&self.view())
    }
}

/// Receipt of an accepted send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Sending contract.
    pub sender: Address,
    /// Amount forwarded to the fee receiver.
    pub fee: Amount,
    /// Unique per send; becomes `src_tx_hash` on the destination.
    pub send_hash: Hash,
    /// The message, with `src_tx_hash` set to `send_hash`.
    pub message: CrossChainMessage,
}

impl OutboundMessage {
    /// Build the receipt. `send_hash` commits to the sender and to every
    /// message field except `src_tx_hash`.
    pub fn new(
        sender: Address,
        fee: Amount,
        nonce: u64,
        payload: Vec<u8>,
        endpoint: Address,
        src_chain_id: ChainId,
        dst_chain_id: ChainId,
    ) -> Self {
        let mut message = CrossChainMessage {
            nonce,
            payload,
            endpoint,
            src_chain_id,
            dst_chain_id,
            src_tx_hash: [0u8; 32],
        };

        let mut preimage = Vec::with_capacity(20 + 32);
        preimage.extend_from_slice(sender.as_bytes());
        preimage.extend_from_slice(&message.hash());
        let send_hash = keccak256(&preimage);

        message.src_tx_hash = send_hash;
        Self {
            sender,
            fee,
            send_hash,
            message,
        }
    }
}

/// Handed to the endpoint's mailbox after fulfillment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    /// Replay-protection key.
    pub message_hash: Hash,
    /// Sender-side nonce.
    pub nonce: u64,
    /// Originating chain.
    pub src_chain_id: ChainId,
    /// Identifier of the send on the originating chain.
    pub src_tx_hash: Hash,
    /// Opaque payload.
    pub payload: Vec<u8>,
}
