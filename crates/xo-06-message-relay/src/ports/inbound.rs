//! # Inbound Ports

use crate::domain::{CrossChainMessage, OutboundMessage, RelayError};
use async_trait::async_trait;
use shared_crypto::RecoverableSignature;
use shared_types::{Address, Amount, ChainId, Hash};

/// Message relay API - inbound port.
#[async_trait]
pub trait MessageRelayApi: Send + Sync {
    /// Accept a message for delivery to `dst_chain_id`.
    ///
    /// `value` is the amount attached by the caller; all of it is
    /// forwarded to the fee receiver once it covers the destination fee.
    async fn send_message(
        &self,
        caller: Address,
        payload: Vec<u8>,
        endpoint: Address,
        dst_chain_id: ChainId,
        value: Amount,
    ) -> Result<OutboundMessage, RelayError>;

    /// Fulfill an inbound message once a quorum of signers attests to its
    /// hash. Returns the hash.
    async fn fulfill_message(
        &self,
        caller: Address,
        message: CrossChainMessage,
        signatures: Vec<RecoverableSignature>,
    ) -> Result<Hash, RelayError>;

    /// True once `message_hash` has been fulfilled.
    fn is_fulfilled(&self, message_hash: &Hash) -> bool;

    /// Number of fulfilled messages.
    fn fulfill_count(&self) -> u64;

    /// Chain this relay serves.
    fn chain_id(&self) -> ChainId;
}
