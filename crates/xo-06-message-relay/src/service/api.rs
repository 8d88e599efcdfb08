//! `MessageRelayApi` implementation.

use super::MessageRelay;
use crate::domain::{CrossChainMessage, DeliveredMessage, OutboundMessage, RelayError};
use crate::ports::inbound::MessageRelayApi;
use async_trait::async_trait;
use shared_bus::OracleEvent;
use shared_crypto::RecoverableSignature;
use shared_types::{Address, Amount, ChainId, Hash};
use tracing::{debug, info, warn};

fn check_payload(payload: &[u8], max: usize) -> Result<(), RelayError> {
    if payload.is_empty() {
        return Err(RelayError::InvalidPayload);
    }
    if payload.len() > max {
        return Err(RelayError::PayloadTooLarge {
            len: payload.len(),
            max,
        });
    }
    Ok(())
}

#[async_trait]
impl MessageRelayApi for MessageRelay {
    async fn send_message(
        &self,
        caller: Address,
        payload: Vec<u8>,
        endpoint: Address,
        dst_chain_id: ChainId,
        value: Amount,
    ) -> Result<OutboundMessage, RelayError> {
        let outbound = {
            let mut inner = self.inner.write();

            inner.access.ensure_contract_caller(&caller)?;
            check_payload(&payload, inner.max_payload_len)?;
            if endpoint.is_zero() {
                return Err(RelayError::InvalidEndpoint);
            }
            let required = match inner.fee_controller.fee(dst_chain_id) {
                Some(fee) if dst_chain_id != self.chain_id => fee,
                _ => return Err(RelayError::InvalidDstChainId { dst_chain_id }),
            };
            if value < required {
                return Err(RelayError::InsufficientFee {
                    required,
                    attached: value,
                });
            }

            self.fees
                .transfer(caller, inner.fee_receiver, value)
                .map_err(|e| RelayError::FeeTransfer { reason: e.0 })?;

            inner.outbound_nonce += 1;
            OutboundMessage::new(
                caller,
                value,
                inner.outbound_nonce,
                payload,
                endpoint,
                self.chain_id,
                dst_chain_id,
            )
        };

        info!(
            nonce = outbound.message.nonce,
            sender = %caller,
            dst_chain_id,
            fee = value,
            "Message sent"
        );
        self.events
            .publish(OracleEvent::MessageSent {
                nonce: outbound.message.nonce,
                sender: caller,
                endpoint,
                src_chain_id: self.chain_id,
                dst_chain_id,
                payload: outbound.message.payload.clone(),
                fee: value,
                send_hash: outbound.send_hash,
            })
            .await;

        Ok(outbound)
    }

    async fn fulfill_message(
        &self,
        caller: Address,
        message: CrossChainMessage,
        signatures: Vec<RecoverableSignature>,
    ) -> Result<Hash, RelayError> {
        let message_hash = message.hash();

        let fulfill_count = {
            let mut inner = self.inner.write();

            inner.access.ensure_controller(&caller)?;
            check_payload(&message.payload, inner.max_payload_len)?;
            if message.endpoint.is_zero() {
                return Err(RelayError::InvalidEndpoint);
            }
            if message.src_chain_id == self.chain_id || message.dst_chain_id != self.chain_id {
                return Err(RelayError::ChainMismatch {
                    src_chain_id: message.src_chain_id,
                    dst_chain_id: message.dst_chain_id,
                    local_chain_id: self.chain_id,
                });
            }
            if inner.fulfilled.contains(&message_hash) {
                return Err(RelayError::AlreadyFulfilled { message_hash });
            }

            let quorum = self.verifier.verify_hash(&message_hash, &signatures)?;
            debug!(signers = quorum.count, threshold = quorum.threshold, "Message quorum reached");

            inner.fulfilled.insert(message_hash);
            inner.fulfill_count += 1;
            inner.fulfill_count
        };

        info!(
            message_hash = %hex::encode(message_hash),
            nonce = message.nonce,
            src_chain_id = message.src_chain_id,
            fulfill_count,
            "Message fulfilled"
        );
        self.events
            .publish(OracleEvent::MessageFulfilled {
                message_hash,
                nonce: message.nonce,
                endpoint: message.endpoint,
                src_chain_id: message.src_chain_id,
                fulfill_count,
            })
            .await;

        let endpoint = message.endpoint;
        let delivered = DeliveredMessage {
            message_hash,
            nonce: message.nonce,
            src_chain_id: message.src_chain_id,
            src_tx_hash: message.src_tx_hash,
            payload: message.payload,
        };
        if let Err(e) = self.endpoints.deliver(&endpoint, delivered) {
            warn!(%endpoint, error = %e, "Endpoint refused fulfilled message");
            self.events
                .publish(OracleEvent::MessageDeliveryFailed {
                    message_hash,
                    endpoint,
                    reason: e.to_string(),
                })
                .await;
        }

        Ok(message_hash)
    }

    fn is_fulfilled(&self, message_hash: &Hash) -> bool {
        self.inner.read().fulfilled.contains(message_hash)
    }

    fn fulfill_count(&self) -> u64 {
        self.inner.read().fulfill_count
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
