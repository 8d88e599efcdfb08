//! # Signer Registry Subsystem (XO-01)
//!
//! Holds the set of identities allowed to attest, the quorum threshold, and
//! the caller access policy (owner, controllers, contracts, whitelist, pause)
//! that every mutating entry point consults first.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): plain state structs with checked mutators
//! - **Registry** (`registry.rs`): shared, lock-protected handle read by the
//!   signature verifier and written by the owning service
//!
//! ## Invariants
//!
//! - `threshold <= |signers|` at all times; removing signers clamps the
//!   threshold down and the owner reconciles with `set_threshold`
//! - The zero address is never a signer, controller, contract or whitelisted

pub mod domain;
pub mod registry;

pub use domain::access::AccessPolicy;
pub use domain::errors::{AccessError, RegistryError};
pub use domain::signer_set::SignerSet;
pub use registry::SignerRegistry;
