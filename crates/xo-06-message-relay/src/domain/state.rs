//! Serializable contents of a message relay.

use super::errors::RelayError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};
use std::collections::BTreeSet;
use xo_01_signer_registry::{AccessPolicy, RegistryError, SignerSet};

/// Everything a relay needs to resume after restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayState {
    /// Roles and flags.
    pub access: AccessPolicy,
    /// Authorized attesters.
    pub signers: SignerSet,
    /// Destination of send fees.
    pub fee_receiver: Address,
    /// Every message hash ever fulfilled. Only grows.
    pub fulfilled: BTreeSet<Hash>,
    /// Number of fulfillments.
    pub fulfill_count: u64,
    /// Last outbound nonce assigned.
    pub outbound_nonce: u64,
    /// Largest accepted payload.
    pub max_payload_len: usize,
}

impl RelayState {
    /// Check cross-field invariants before the state is accepted.
    pub fn validate(&self) -> Result<(), RelayError> {
        self.access.validate()?;
        self.signers.validate()?;
        if self.fee_receiver.is_zero() {
            return Err(RegistryError::InvalidAddress.into());
        }
        if self.fulfill_count != self.fulfilled.len() as u64 {
            return Err(RelayError::InvalidState {
                reason: format!(
                    "fulfill count {} does not match {} fulfilled hashes",
                    self.fulfill_count,
                    self.fulfilled.len()
                ),
            });
        }
        if self.max_payload_len == 0 {
            return Err(RelayError::InvalidPayload);
        }
        Ok(())
    }
}
