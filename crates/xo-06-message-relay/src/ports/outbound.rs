//! # Outbound Ports
//!
//! Fee lookup and fee collection are external collaborators. Endpoint
//! delivery crosses a mailbox and has its own failure domain.

use crate::domain::DeliveredMessage;
use shared_bus::MailboxRouter;
use shared_types::{Address, Amount, ChainId};
use thiserror::Error;

/// Per-destination fee lookup. The relay only reads it.
pub trait FeeController: Send + Sync {
    /// Identity of this controller, for audit and validation.
    fn id(&self) -> Address;

    /// Fee for sending to `dst_chain_id`, `None` if the chain is unknown.
    fn fee(&self, dst_chain_id: ChainId) -> Option<Amount>;
}

/// Fee collection refused by the receiver side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FeeTransferError(pub String);

/// Collects send fees on behalf of a receiver.
pub trait FeeReceiver: Send + Sync {
    /// Move `amount` from `payer` to `receiver`.
    fn transfer(
        &self,
        payer: Address,
        receiver: Address,
        amount: Amount,
    ) -> Result<(), FeeTransferError>;
}

/// Mailboxes of destination endpoints.
pub type EndpointRouter = MailboxRouter<DeliveredMessage>;
