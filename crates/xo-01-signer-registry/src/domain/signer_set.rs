//! # Signer Set
//!
//! Authorized attesters plus the number of distinct signatures needed for
//! quorum.

use super::errors::RegistryError;
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::BTreeSet;

/// Authorized signers and the quorum threshold.
///
/// A fresh set has no signers and threshold `0`. A zero threshold is
/// satisfied by an empty signature list, so the owner must configure one
/// before the service is trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerSet {
    signers: BTreeSet<Address>,
    threshold: u32,
}

impl SignerSet {
    /// Empty set, threshold `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from configuration, validating every entry.
    pub fn with_signers<I>(signers: I, threshold: u32) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Address>,
    {
        let mut set = Self::new();
        for signer in signers {
            set.set_signer(signer, true)?;
        }
        if threshold > 0 {
            set.set_threshold(threshold)?;
        }
        Ok(set)
    }

    /// Add (`active = true`) or remove a signer.
    ///
    /// Returns whether membership changed. Removal clamps the threshold so
    /// it never exceeds the remaining signer count.
    pub fn set_signer(&mut self, signer: Address, active: bool) -> Result<bool, RegistryError> {
        if signer.is_zero() {
            return Err(RegistryError::InvalidAddress);
        }

        let changed = if active {
            self.signers.insert(signer)
        } else {
            self.signers.remove(&signer)
        };

        if self.threshold > self.len() {
            self.threshold = self.len();
        }
        Ok(changed)
    }

    /// Set the quorum threshold; must be in `1..=len()`.
    pub fn set_threshold(&mut self, threshold: u32) -> Result<(), RegistryError> {
        if threshold == 0 || threshold > self.len() {
            return Err(RegistryError::InvalidThreshold {
                requested: threshold,
                signers: self.len(),
            });
        }
        self.threshold = threshold;
        Ok(())
    }

    /// True if `identity` may attest.
    pub fn is_signer(&self, identity: &Address) -> bool {
        self.signers.contains(identity)
    }

    /// Number of authorized signers.
    pub fn len(&self) -> u32 {
        u32::try_from(self.signers.len()).unwrap_or(u32::MAX)
    }

    /// True when no signer is registered.
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Distinct signatures required for quorum (`0` before configuration).
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Signers in ascending address order.
    pub fn signers(&self) -> impl Iterator<Item = &Address> {
        self.signers.iter()
    }

    /// Check invariants on state loaded from outside (e.g. a snapshot).
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.signers.iter().any(Address::is_zero) {
            return Err(RegistryError::InvalidAddress);
        }
        if self.threshold > self.len() {
            return Err(RegistryError::InvalidThreshold {
                requested: self.threshold,
                signers: self.len(),
            });
        }
        Ok(())
    }
}
