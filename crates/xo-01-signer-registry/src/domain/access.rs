//! # Access Policy
//!
//! Role checks shared by the request registry and the message relay. Each
//! service owns one policy; nothing here is global.

use super::errors::{AccessError, RegistryError};
use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::BTreeSet;

/// Owner, controllers, contract callers, whitelist and pause flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    owner: Address,
    controllers: BTreeSet<Address>,
    contracts: BTreeSet<Address>,
    whitelist: BTreeSet<Address>,
    only_whitelist: bool,
    paused: bool,
}

impl AccessPolicy {
    /// Fresh policy administered by `owner`.
    pub fn new(owner: Address) -> Result<Self, RegistryError> {
        if owner.is_zero() {
            return Err(RegistryError::InvalidAddress);
        }
        Ok(Self {
            owner,
            controllers: BTreeSet::new(),
            contracts: BTreeSet::new(),
            whitelist: BTreeSet::new(),
            only_whitelist: false,
            paused: false,
        })
    }

    // =========================================================================
    // CHECKS
    // =========================================================================

    /// Caller must be the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), AccessError> {
        if *caller != self.owner {
            return Err(AccessError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    /// Caller must be a registered controller (relayer).
    pub fn ensure_controller(&self, caller: &Address) -> Result<(), AccessError> {
        if !self.controllers.contains(caller) {
            return Err(AccessError::ControllerForbidden { caller: *caller });
        }
        Ok(())
    }

    /// Entry point must not be paused.
    pub fn ensure_not_paused(&self) -> Result<(), AccessError> {
        if self.paused {
            return Err(AccessError::Paused);
        }
        Ok(())
    }

    /// Gate for creating requests and sending messages, checked in order:
    /// registered contract, not paused, whitelisted when whitelist mode is on.
    pub fn ensure_contract_caller(&self, caller: &Address) -> Result<(), AccessError> {
        if !self.contracts.contains(caller) {
            return Err(AccessError::OnlyContractCaller { caller: *caller });
        }
        self.ensure_not_paused()?;
        if self.only_whitelist && !self.whitelist.contains(caller) {
            return Err(AccessError::WhitelistForbidden { caller: *caller });
        }
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// True if `identity` is a controller.
    pub fn is_controller(&self, identity: &Address) -> bool {
        self.controllers.contains(identity)
    }

    /// True if `identity` is a registered contract caller.
    pub fn is_contract(&self, identity: &Address) -> bool {
        self.contracts.contains(identity)
    }

    /// True if `identity` is whitelisted.
    pub fn is_whitelisted(&self, identity: &Address) -> bool {
        self.whitelist.contains(identity)
    }

    /// Whitelist mode flag.
    pub fn only_whitelist(&self) -> bool {
        self.only_whitelist
    }

    /// Pause flag.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // =========================================================================
    // MUTATORS (caller already checked by the owning service)
    // =========================================================================

    /// Hand administration to `new_owner`.
    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<(), RegistryError> {
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidAddress);
        }
        self.owner = new_owner;
        Ok(())
    }

    /// Grant or revoke the controller role.
    pub fn set_controller(&mut self, identity: Address, active: bool) -> Result<(), RegistryError> {
        toggle(&mut self.controllers, identity, active)
    }

    /// Register or unregister a contract caller.
    pub fn set_contract(&mut self, identity: Address, active: bool) -> Result<(), RegistryError> {
        toggle(&mut self.contracts, identity, active)
    }

    /// Add or remove a whitelist entry.
    pub fn set_whitelist(&mut self, identity: Address, active: bool) -> Result<(), RegistryError> {
        toggle(&mut self.whitelist, identity, active)
    }

    /// Turn whitelist mode on or off.
    pub fn set_only_whitelist(&mut self, enabled: bool) {
        self.only_whitelist = enabled;
    }

    /// Pause or resume the gated entry points.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Check invariants on state loaded from outside.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let any_zero = self
            .controllers
            .iter()
            .chain(&self.contracts)
            .chain(&self.whitelist)
            .any(Address::is_zero);
        if self.owner.is_zero() || any_zero {
            return Err(RegistryError::InvalidAddress);
        }
        Ok(())
    }
}

fn toggle(set: &mut BTreeSet<Address>, identity: Address, active: bool) -> Result<(), RegistryError> {
    if identity.is_zero() {
        return Err(RegistryError::InvalidAddress);
    }
    if active {
        set.insert(identity);
    } else {
        set.remove(&identity);
    }
    Ok(())
}
