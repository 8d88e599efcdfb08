//! # Price Requests

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, AssetIndex, Price, RequestId, Timestamp};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state. Every state except `Requested` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting attestations.
    Requested,
    /// Quorum reached and prices written.
    Fulfilled,
    /// Withdrawn by the requester.
    Cancelled,
    /// Closed after expiration without fulfillment.
    Refunded,
}

impl RequestStatus {
    /// True for `Fulfilled`, `Cancelled` and `Refunded`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Requested)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Requested => "requested",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

/// A price request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Monotonic, 1-based.
    pub id: RequestId,
    /// Creation time. Signers attest over this exact timestamp.
    pub created_at: Timestamp,
    /// Requesting contract; receives the price callback.
    pub owner: Address,
    /// Opaque data echoed back in the callback.
    pub payload: Vec<u8>,
    /// Lifecycle state.
    pub status: RequestStatus,
    /// Deadline for fulfillment, `0` for none.
    pub expiration: Timestamp,
    /// Amount reserved from the owner's fee balance.
    pub fee_deposit: Amount,
    /// Minimum fee in force when the request was created.
    pub fee_quote: Amount,
}

impl Request {
    /// True once `now` is past a set expiration.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiration != 0 && now > self.expiration
    }
}

/// Result of a fulfillment that passed the caller and state checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillOutcome {
    /// Quorum reached; the request is now `Fulfilled`.
    Fulfilled {
        /// Consensus prices that were written.
        prices: BTreeMap<AssetIndex, Price>,
        /// Assets skipped because a newer request already wrote them.
        stale_assets: Vec<AssetIndex>,
        /// Fee moved to the fulfilling controller.
        fee_charged: Amount,
    },
    /// Quorum failed; the request stays `Requested`.
    Rejected {
        /// Consensus failure text.
        reason: String,
    },
}

impl FulfillOutcome {
    /// True for `Fulfilled`.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, FulfillOutcome::Fulfilled { .. })
    }
}
