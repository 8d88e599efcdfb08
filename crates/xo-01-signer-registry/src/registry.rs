//! # Signer Registry
//!
//! Lock-protected [`SignerSet`] shared between the service that administers
//! it and the verifier that reads it. Changes are visible to the next
//! verification immediately.

use crate::domain::errors::RegistryError;
use crate::domain::signer_set::SignerSet;
use parking_lot::RwLock;
use shared_types::Address;
use tracing::info;

/// Shared handle over one service's signer set.
#[derive(Debug, Default)]
pub struct SignerRegistry {
    set: RwLock<SignerSet>,
}

impl SignerRegistry {
    /// Registry seeded with `set`.
    pub fn new(set: SignerSet) -> Self {
        Self {
            set: RwLock::new(set),
        }
    }

    /// Add or remove a signer. Returns whether membership changed.
    pub fn set_signer(&self, signer: Address, active: bool) -> Result<bool, RegistryError> {
        let mut set = self.set.write();
        let changed = set.set_signer(signer, active)?;
        if changed {
            info!(
                %signer,
                active,
                total = set.len(),
                threshold = set.threshold(),
                "Signer set updated"
            );
        }
        Ok(changed)
    }

    /// Set the quorum threshold.
    pub fn set_threshold(&self, threshold: u32) -> Result<(), RegistryError> {
        self.set.write().set_threshold(threshold)?;
        info!(threshold, "Threshold updated");
        Ok(())
    }

    /// True if `identity` may attest.
    pub fn is_signer(&self, identity: &Address) -> bool {
        self.set.read().is_signer(identity)
    }

    /// Number of authorized signers.
    pub fn total_signers(&self) -> u32 {
        self.set.read().len()
    }

    /// Configured threshold.
    pub fn threshold(&self) -> u32 {
        self.set.read().threshold()
    }

    /// Run `f` against a consistent view of the set.
    pub fn with_set<R>(&self, f: impl FnOnce(&SignerSet) -> R) -> R {
        f(&self.set.read())
    }

    /// Copy of the current set, for persistence.
    pub fn snapshot(&self) -> SignerSet {
        self.set.read().clone()
    }

    /// Replace the whole set after validating it.
    pub fn restore(&self, set: SignerSet) -> Result<(), RegistryError> {
        set.validate()?;
        *self.set.write() = set;
        Ok(())
    }
}
