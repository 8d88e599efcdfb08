//! # Registry Errors

use shared_types::{Address, ErrorKind};
use thiserror::Error;

/// Caller authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Admin operation from someone other than the owner.
    #[error("Ownable: caller is not the owner")]
    NotOwner {
        /// Rejected caller.
        caller: Address,
    },

    /// Fulfillment or refund from an unregistered controller.
    #[error("controller: forbidden")]
    ControllerForbidden {
        /// Rejected caller.
        caller: Address,
    },

    /// Request or send from an identity that is not a registered contract.
    #[error("caller: only contract")]
    OnlyContractCaller {
        /// Rejected caller.
        caller: Address,
    },

    /// Whitelist mode is on and the caller is not listed.
    #[error("whitelist: forbidden")]
    WhitelistForbidden {
        /// Rejected caller.
        caller: Address,
    },

    /// Entry point disabled by the owner.
    #[error("Pausable: paused")]
    Paused,
}

impl AccessError {
    /// Taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::Paused => ErrorKind::State,
            _ => ErrorKind::Authorization,
        }
    }
}

/// Signer set and admin setter failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// The zero address was supplied where an identity is required.
    #[error("invalid address")]
    InvalidAddress,

    /// Threshold of zero or above the signer count.
    #[error("invalid threshold: {requested} (signers: {signers})")]
    InvalidThreshold {
        /// Requested threshold.
        requested: u32,
        /// Current signer count.
        signers: u32,
    },
}

impl RegistryError {
    /// Taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Access(e) => e.kind(),
            RegistryError::InvalidAddress | RegistryError::InvalidThreshold { .. } => {
                ErrorKind::Validation
            }
        }
    }
}
