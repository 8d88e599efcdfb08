//! # Request Registry Subsystem (XO-05)
//!
//! Price request lifecycle for the oracle.
//!
//! ## State Machine
//!
//! ```text
//!              fulfill (controller, quorum)
//!            ┌──────────────────────────────→ Fulfilled
//!            │
//! Requested ─┼── cancel (requester) ────────→ Cancelled
//!            │
//!            └── refund (controller | owner,
//!                after expiration) ─────────→ Refunded
//! ```
//!
//! Terminal states are final; any further transition is
//! `AlreadyFinalized`.
//!
//! ## Fulfillment
//!
//! - Attestations sign `keccak256(u256 timestamp ‖ encoded_prices)` with the
//!   personal-sign prefix, and must carry the request's creation timestamp
//! - Quorum failure is a soft failure: a `FulfillRequest` event with
//!   `success = false` and the request stays open
//! - Each asset is written only when at least the threshold of accepted
//!   signers supplied it
//! - An asset already written by a newer request is skipped, not failed
//!
//! ## Fees
//!
//! See [`domain::fees`]. The requester's balance decreases by exactly the
//! amount the fulfilling controller's balance increases.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    Attestation, FeeLedger, FeeSchedule, FulfillOutcome, RegistryState, Request, RequestError,
    RequestStatus,
};
pub use ports::{CallbackRouter, PriceCallback, PriceOracleApi};
pub use service::RequestRegistry;
