//! # Message Relay Subsystem (XO-06)
//!
//! Generic cross-chain messaging over the same signer quorum as the price
//! oracle.
//!
//! ## Send
//!
//! A registered contract sends `(payload, endpoint, dst_chain_id)` with a
//! value that covers the destination fee. The whole value goes to the fee
//! receiver and the relay assigns the next outbound nonce.
//!
//! ## Fulfill
//!
//! ```text
//! controller ─→ payload ─→ endpoint ─→ chain ids ─→ replay ─→ quorum
//!                                                              │
//!                              commit hash, count + 1  ←───────┘
//!                                        │
//!                                        └─→ endpoint mailbox
//! ```
//!
//! Signers `personal_sign` the ABI-encoded message hash. Any failure is
//! fatal: nothing changes. A hash that was fulfilled once is rejected
//! forever after, even when the endpoint refused delivery.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryFeeReceiver, StaticFeeController};
pub use domain::{CrossChainMessage, DeliveredMessage, OutboundMessage, RelayError, RelayState};
pub use ports::{EndpointRouter, FeeController, FeeReceiver, FeeTransferError, MessageRelayApi};
pub use service::{MessageRelay, DEFAULT_MAX_PAYLOAD_LEN};
