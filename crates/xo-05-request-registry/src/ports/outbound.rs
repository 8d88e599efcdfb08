//! # Outbound Ports
//!
//! Consumer callbacks leave the registry through a mailbox keyed by the
//! requesting contract. The registry never waits on the consumer.

use shared_bus::MailboxRouter;
use shared_types::{AssetIndex, Price, RequestId};
use std::collections::BTreeMap;

/// Delivered to the request owner after a successful fulfillment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCallback {
    /// Fulfilled request.
    pub request_id: RequestId,
    /// Payload supplied at creation.
    pub payload: Vec<u8>,
    /// Consensus prices written by this fulfillment.
    pub prices: BTreeMap<AssetIndex, Price>,
}

/// Mailboxes of requesting contracts.
pub type CallbackRouter = MailboxRouter<PriceCallback>;
