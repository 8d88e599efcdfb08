//! Inbound API and outbound collaborator ports.

pub mod inbound;
pub mod outbound;

pub use inbound::MessageRelayApi;
pub use outbound::{EndpointRouter, FeeController, FeeReceiver, FeeTransferError};
