//! # Fees
//!
//! Requesters pre-deposit a balance. Creating a request reserves part of
//! it; fulfillment moves the execution cost plus surcharge to the
//! controller and releases the rest.
//!
//! ```text
//! estimate_fee(units, gas_price) =
//!     max(units, min_gas_limit) * gas_price * (10000 + fulfill_fee_bps) / 10000
//! ```

use super::errors::RequestError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount};
use std::collections::BTreeMap;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Fee parameters set by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Surcharge over execution cost, in basis points.
    pub fulfill_fee_bps: u32,
    /// Absolute floor for a request deposit.
    pub min_fee_balance: Amount,
    /// Gas price assumed when the controller reports a lower one.
    pub min_gas_price: Amount,
    /// Units charged at minimum for any fulfillment.
    pub min_gas_limit: u64,
    /// Fixed cost of a fulfillment, in units.
    pub base_units: u64,
    /// Cost of verifying one attestation.
    pub units_per_signature: u64,
    /// Cost of writing one feed.
    pub units_per_asset: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fulfill_fee_bps: 3_000,
            min_fee_balance: 20_000_000,
            min_gas_price: 10_000_000,
            min_gas_limit: 1_000_000,
            base_units: 150_000,
            units_per_signature: 8_000,
            units_per_asset: 45_000,
        }
    }
}

impl FeeSchedule {
    /// Cost of `units` at `gas_price`, plus surcharge. Saturates instead of
    /// wrapping.
    pub fn estimate_fee(&self, units: u64, gas_price: Amount) -> Amount {
        let units = Amount::from(units.max(self.min_gas_limit));
        let multiplier = Amount::from(BPS_DENOMINATOR + self.fulfill_fee_bps);
        units
            .saturating_mul(gas_price)
            .saturating_mul(multiplier)
            / Amount::from(BPS_DENOMINATOR)
    }

    /// Smallest deposit a new request may carry.
    pub fn minimum_fee(&self) -> Amount {
        self.min_fee_balance
            .max(self.estimate_fee(self.min_gas_limit, self.min_gas_price))
    }

    /// Execution units for a fulfillment with the given shape.
    pub fn estimate_units(&self, signatures: usize, assets: usize) -> u64 {
        let signatures = u64::try_from(signatures).unwrap_or(u64::MAX);
        let assets = u64::try_from(assets).unwrap_or(u64::MAX);
        self.base_units
            .saturating_add(self.units_per_signature.saturating_mul(signatures))
            .saturating_add(self.units_per_asset.saturating_mul(assets))
    }

    /// Fee actually charged for a fulfillment, capped by the deposit.
    pub fn charge(&self, deposit: Amount, units: u64, reported_gas_price: Amount) -> Amount {
        let gas_price = reported_gas_price.max(self.min_gas_price);
        deposit.min(self.estimate_fee(units, gas_price))
    }

    /// Check bounds on parameters loaded from outside.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.fulfill_fee_bps > BPS_DENOMINATOR {
            return Err(RequestError::InvalidFulfillFee {
                bps: self.fulfill_fee_bps,
            });
        }
        Ok(())
    }
}

/// Per-identity balances and reservations.
///
/// `reserved <= balance` holds for every identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLedger {
    balances: BTreeMap<Address, Amount>,
    reserved: BTreeMap<Address, Amount>,
}

impl FeeLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total balance, reserved or not.
    pub fn balance(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Amount held for open requests.
    pub fn reserved(&self, owner: &Address) -> Amount {
        self.reserved.get(owner).copied().unwrap_or(0)
    }

    /// Balance not held for open requests.
    pub fn available(&self, owner: &Address) -> Amount {
        self.balance(owner).saturating_sub(self.reserved(owner))
    }

    /// Sum of all balances.
    pub fn total(&self) -> Amount {
        self.balances.values().fold(0, |acc, b| acc.saturating_add(*b))
    }

    /// Credit `amount` to `owner`.
    pub fn deposit(&mut self, owner: Address, amount: Amount) {
        let balance = self.balances.entry(owner).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Debit `amount` from the unreserved balance.
    pub fn withdraw(&mut self, owner: &Address, amount: Amount) -> Result<(), RequestError> {
        let available = self.available(owner);
        if amount > available {
            return Err(RequestError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.debit(owner, amount);
        Ok(())
    }

    /// Hold `amount` for a new request.
    pub fn reserve(&mut self, owner: &Address, amount: Amount) -> Result<(), RequestError> {
        let available = self.available(owner);
        if amount > available {
            return Err(RequestError::InsufficientFee {
                required: amount,
                available,
            });
        }
        *self.reserved.entry(*owner).or_insert(0) += amount;
        Ok(())
    }

    /// Drop a hold without moving funds.
    pub fn release(&mut self, owner: &Address, amount: Amount) {
        if let Some(held) = self.reserved.get_mut(owner) {
            *held = held.saturating_sub(amount);
            if *held == 0 {
                self.reserved.remove(owner);
            }
        }
    }

    /// Release `reservation` held by `payer` and move `charge` of it to
    /// `payee`.
    pub fn settle(&mut self, payer: &Address, payee: Address, reservation: Amount, charge: Amount) {
        let charge = charge.min(reservation);
        self.release(payer, reservation);
        self.debit(payer, charge);
        self.deposit(payee, charge);
    }

    /// Check `reserved <= balance` for every identity.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (owner, held) in &self.reserved {
            if *held > self.balance(owner) {
                return Err(RequestError::InvalidState {
                    reason: format!("reservation of {owner} exceeds its balance"),
                });
            }
        }
        Ok(())
    }

    fn debit(&mut self, owner: &Address, amount: Amount) {
        if let Some(balance) = self.balances.get_mut(owner) {
            *balance = balance.saturating_sub(amount);
            if *balance == 0 {
                self.balances.remove(owner);
            }
        }
    }
}
