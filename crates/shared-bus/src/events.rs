//! # Oracle Events
//!
//! Side effects emitted by the price oracle and message relay for relayer
//! observers, audit trails and metrics.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, AssetIndex, ChainId, Hash, Price, RequestId, Timestamp};

/// Service that emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSource {
    /// Request registry, price feed and their admin surface.
    PriceOracle,
    /// Cross-chain message relay and its admin surface.
    MessageRelay,
}

/// Events published on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleEvent {
    /// A price request was accepted and awaits attestations.
    RequestCreated {
        /// New request id.
        request_id: RequestId,
        /// Requesting contract.
        owner: Address,
        /// Opaque request payload.
        payload: Vec<u8>,
        /// Creation time; attestations must be signed over this timestamp.
        created_at: Timestamp,
        /// Deadline, `0` for none.
        expiration: Timestamp,
        /// Fee reserved for this request.
        fee_deposit: Amount,
    },

    /// Outcome of a price fulfillment attempt, emitted on success and soft-fail.
    FulfillRequest {
        /// Target request.
        request_id: RequestId,
        /// True when the request reached `Fulfilled`.
        success: bool,
        /// Empty on success, otherwise the consensus failure.
        reason: String,
    },

    /// A consensus price was written to the feed.
    PriceUpdated {
        /// Asset written.
        asset_index: AssetIndex,
        /// Round after the write.
        round: u64,
        /// Consensus price.
        price: Price,
        /// Request that produced it.
        source_request_id: RequestId,
        /// Write time.
        updated_at: Timestamp,
    },

    /// An older request tried to overwrite a newer value and was skipped.
    StaleUpdateSkipped {
        /// Asset left untouched.
        asset_index: AssetIndex,
        /// Request id already in the feed.
        current_request_id: RequestId,
        /// Request id that lost.
        attempted_request_id: RequestId,
    },

    /// Fee moved from requester to the fulfilling controller.
    FeeSettled {
        /// Fulfilled request.
        request_id: RequestId,
        /// Requester.
        payer: Address,
        /// Fulfilling controller.
        payee: Address,
        /// Amount moved.
        amount: Amount,
    },

    /// Fee balance credited to a requester.
    FeeDeposited {
        /// Credited account.
        owner: Address,
        /// Amount added.
        amount: Amount,
    },

    /// Unreserved fee balance paid out.
    FeeWithdrawn {
        /// Debited account.
        owner: Address,
        /// Amount removed.
        amount: Amount,
    },

    /// Owner cancelled a pending request.
    RequestCancelled {
        /// Cancelled request.
        request_id: RequestId,
        /// Requesting contract.
        owner: Address,
    },

    /// An expired request was closed without fulfillment.
    RequestRefunded {
        /// Refunded request.
        request_id: RequestId,
        /// Controller or owner that closed it.
        refunded_by: Address,
        /// True for the admin path.
        admin: bool,
    },

    /// A message was accepted for cross-chain delivery.
    MessageSent {
        /// Sender-side nonce.
        nonce: u64,
        /// Sending contract.
        sender: Address,
        /// Destination handler.
        endpoint: Address,
        /// This chain.
        src_chain_id: ChainId,
        /// Target chain.
        dst_chain_id: ChainId,
        /// Opaque payload.
        payload: Vec<u8>,
        /// Fee forwarded to the fee receiver.
        fee: Amount,
        /// Hash the destination uses as `src_tx_hash`.
        send_hash: Hash,
    },

    /// A message reached quorum on this chain.
    MessageFulfilled {
        /// Replay-protection key.
        message_hash: Hash,
        /// Sender-side nonce.
        nonce: u64,
        /// Destination handler.
        endpoint: Address,
        /// Originating chain.
        src_chain_id: ChainId,
        /// Count after this fulfillment.
        fulfill_count: u64,
    },

    /// The endpoint mailbox refused a fulfilled message.
    MessageDeliveryFailed {
        /// Replay-protection key (remains fulfilled).
        message_hash: Hash,
        /// Unreachable handler.
        endpoint: Address,
        /// Delivery failure.
        reason: String,
    },

    /// An administrative setter changed configuration.
    AdminChanged {
        /// Service whose configuration changed.
        source: EventSource,
        /// Setter name, e.g. `set_threshold`.
        action: String,
        /// Human-readable new value.
        detail: String,
    },
}

impl OracleEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::RequestCreated { .. }
            | Self::FulfillRequest { .. }
            | Self::FeeSettled { .. }
            | Self::FeeDeposited { .. }
            | Self::FeeWithdrawn { .. }
            | Self::RequestCancelled { .. }
            | Self::RequestRefunded { .. } => EventTopic::PriceRequests,
            Self::PriceUpdated { .. } | Self::StaleUpdateSkipped { .. } => EventTopic::PriceFeed,
            Self::MessageSent { .. }
            | Self::MessageFulfilled { .. }
            | Self::MessageDeliveryFailed { .. } => EventTopic::Messages,
            Self::AdminChanged { .. } => EventTopic::Admin,
        }
    }

    /// Get the emitting service.
    #[must_use]
    pub fn source(&self) -> EventSource {
        match self {
            Self::MessageSent { .. }
            | Self::MessageFulfilled { .. }
            | Self::MessageDeliveryFailed { .. } => EventSource::MessageRelay,
            Self::AdminChanged { source, .. } => *source,
            _ => EventSource::PriceOracle,
        }
    }

    /// True when the event marks a finished state change that must be on
    /// disk before the caller sees success.
    ///
    /// Feed writes, fee settlement and delivery failures ride along with a
    /// committing `FulfillRequest` or `MessageFulfilled` from the same call.
    #[must_use]
    pub fn is_commit(&self) -> bool {
        match self {
            Self::FulfillRequest { success, .. } => *success,
            Self::RequestCreated { .. }
            | Self::FeeDeposited { .. }
            | Self::FeeWithdrawn { .. }
            | Self::RequestCancelled { .. }
            | Self::RequestRefunded { .. }
            | Self::MessageSent { .. }
            | Self::MessageFulfilled { .. }
            | Self::AdminChanged { .. } => true,
            Self::PriceUpdated { .. }
            | Self::StaleUpdateSkipped { .. }
            | Self::FeeSettled { .. }
            | Self::MessageDeliveryFailed { .. } => false,
        }
    }
}

/// Event topics for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Request lifecycle and fee settlement.
    PriceRequests,
    /// Feed writes and stale skips.
    PriceFeed,
    /// Cross-chain message send and fulfill.
    Messages,
    /// Configuration changes.
    Admin,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Sources to include. Empty means all sources.
    pub sources: Vec<EventSource>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from specific services.
    #[must_use]
    pub fn from_sources(sources: Vec<EventSource>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &OracleEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.sources.is_empty() || self.sources.contains(&event.source());

        topic_match && source_match
    }
}
