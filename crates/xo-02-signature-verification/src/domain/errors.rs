//! # Consensus Errors

use shared_types::{Address, ErrorKind};
use thiserror::Error;

/// Quorum failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsensusError {
    /// A registered signer appears more than once in the batch.
    #[error("signer duplicate")]
    DuplicateSigner {
        /// Repeated signer.
        signer: Address,
    },

    /// Too few distinct registered signers.
    #[error("signers under threshold")]
    BelowThreshold {
        /// Distinct valid signers found.
        got: u32,
        /// Signers required.
        required: u32,
    },
}

impl ConsensusError {
    /// Taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Consensus
    }
}
