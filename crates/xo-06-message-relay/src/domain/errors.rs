//! # Relay Errors
//!
//! Every relay error is fatal, including consensus failures: a rejected
//! fulfillment changes nothing.

use shared_types::{Amount, ChainId, ErrorKind, Hash};
use thiserror::Error;
use xo_01_signer_registry::{AccessError, RegistryError};
use xo_02_signature_verification::ConsensusError;

fn chain_mismatch_message(src_chain_id: &ChainId, local_chain_id: &ChainId) -> &'static str {
    if src_chain_id == local_chain_id {
        "invalid chainId"
    } else {
        "invalid dstChainId"
    }
}

/// Message relay failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Signer set or access list update rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Quorum not reached.
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// Empty payload.
    #[error("invalid payload")]
    InvalidPayload,

    /// Payload above the configured limit.
    #[error("invalid payload: {len} bytes exceeds {max}")]
    PayloadTooLarge {
        /// Received length.
        len: usize,
        /// Configured limit.
        max: usize,
    },

    /// Zero endpoint.
    #[error("invalid endpoint")]
    InvalidEndpoint,

    /// Inbound message that originates here or is not addressed here.
    #[error("{}", chain_mismatch_message(.src_chain_id, .local_chain_id))]
    ChainMismatch {
        /// Declared origin.
        src_chain_id: ChainId,
        /// Declared destination.
        dst_chain_id: ChainId,
        /// This relay's chain.
        local_chain_id: ChainId,
    },

    /// Outbound destination that is this chain or has no fee configured.
    #[error("invalid dstChainId")]
    InvalidDstChainId {
        /// Requested destination.
        dst_chain_id: ChainId,
    },

    /// Attached value below the destination fee.
    #[error("insufficient fee: required {required}, attached {attached}")]
    InsufficientFee {
        /// Destination fee.
        required: Amount,
        /// Value attached to the send.
        attached: Amount,
    },

    /// The fee receiver refused the transfer.
    #[error("fee transfer failed: {reason}")]
    FeeTransfer {
        /// Receiver's reason.
        reason: String,
    },

    /// This message hash was fulfilled before.
    #[error("messageHash already fulfilled")]
    AlreadyFulfilled {
        /// Replayed hash.
        message_hash: Hash,
    },

    /// Restored state failed validation.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// What was inconsistent.
        reason: String,
    },
}

impl RelayError {
    /// Taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::Access(e) => e.kind(),
            RelayError::Registry(e) => e.kind(),
            RelayError::Consensus(e) => e.kind(),
            RelayError::InvalidPayload
            | RelayError::PayloadTooLarge { .. }
            | RelayError::InvalidEndpoint
            | RelayError::ChainMismatch { .. }
            | RelayError::InvalidDstChainId { .. } => ErrorKind::Validation,
            RelayError::InsufficientFee { .. } | RelayError::FeeTransfer { .. } => ErrorKind::Fee,
            RelayError::AlreadyFulfilled { .. } | RelayError::InvalidState { .. } => {
                ErrorKind::State
            }
        }
    }
}
