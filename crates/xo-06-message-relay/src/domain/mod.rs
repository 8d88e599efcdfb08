//! Messages, relay state and errors.

pub mod errors;
pub mod message;
pub mod state;

pub use errors::RelayError;
pub use message::{CrossChainMessage, DeliveredMessage, OutboundMessage};
pub use state::RelayState;
