//! # Verification Entities

use shared_crypto::RecoverableSignature;
use shared_types::{Address, Hash};

/// One signature over the digest it claims to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDigest {
    /// Exact 32 bytes that were signed (already prefixed, if applicable).
    pub digest: Hash,
    /// Recoverable signature.
    pub signature: RecoverableSignature,
    /// Signer the submitter says produced it; `None` to accept any signer.
    pub claimed_signer: Option<Address>,
}

/// Result of a successful quorum check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumOutcome {
    /// Number of distinct valid signers.
    pub count: u32,
    /// Distinct valid signers, in submission order.
    pub signers: Vec<Address>,
    /// Input positions that produced `signers`, same order.
    pub accepted: Vec<usize>,
    /// Threshold the batch was checked against.
    pub threshold: u32,
}
