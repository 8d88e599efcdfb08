//! # Signature Verification Subsystem (XO-02)
//!
//! Counts distinct registered signers over a batch of recoverable
//! signatures and decides whether the batch reaches quorum.
//!
//! ## Rules
//!
//! - A signature that does not recover, recovers to a non-signer, or
//!   recovers to someone other than its declared signer is skipped
//! - A registered signer seen twice in one batch fails the whole batch
//!   with `DuplicateSigner`, at the position of the second occurrence
//! - Fewer than `threshold` distinct signers fails with
//!   `BelowThreshold`; a zero threshold accepts an empty batch
//!
//! Recovery runs in parallel; the duplicate and counting pass runs in
//! submission order so the outcome is independent of scheduling.

pub mod domain;
pub mod verifier;

pub use domain::entities::{QuorumOutcome, SignedDigest};
pub use domain::errors::ConsensusError;
pub use verifier::QuorumVerifier;
