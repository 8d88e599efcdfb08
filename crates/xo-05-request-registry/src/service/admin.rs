//! Owner-only configuration. Every setter emits `AdminChanged`.

use super::{RegistryInner, RequestRegistry};
use crate::domain::fees::BPS_DENOMINATOR;
use crate::domain::RequestError;
use shared_bus::{EventSource, OracleEvent};
use shared_types::{Address, Amount, AssetIndex};
use tracing::info;

impl RequestRegistry {
    async fn apply_admin<F>(
        &self,
        caller: Address,
        action: &'static str,
        apply: F,
    ) -> Result<(), RequestError>
    where
        F: FnOnce(&mut RegistryInner) -> Result<String, RequestError>,
    {
        let detail = {
            let mut inner = self.inner.write();
            inner.access.ensure_owner(&caller)?;
            apply(&mut *inner)?
        };

        info!(action, %detail, "Price oracle configuration changed");
        self.events
            .publish(OracleEvent::AdminChanged {
                source: EventSource::PriceOracle,
                action: action.to_string(),
                detail,
            })
            .await;
        Ok(())
    }

    /// Add or remove an attester.
    pub async fn set_signer(
        &self,
        caller: Address,
        signer: Address,
        active: bool,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_signer", |_| {
            self.signers.set_signer(signer, active)?;
            Ok(format!("{signer}={active}"))
        })
        .await
    }

    /// Set the quorum threshold.
    pub async fn set_threshold(&self, caller: Address, threshold: u32) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_threshold", |_| {
            self.signers.set_threshold(threshold)?;
            Ok(threshold.to_string())
        })
        .await
    }

    /// Grant or revoke the controller role.
    pub async fn set_controller(
        &self,
        caller: Address,
        controller: Address,
        active: bool,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_controller", |inner| {
            inner.access.set_controller(controller, active)?;
            Ok(format!("{controller}={active}"))
        })
        .await
    }

    /// Register or unregister a requesting contract.
    pub async fn set_contract(
        &self,
        caller: Address,
        contract: Address,
        active: bool,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_contract", |inner| {
            inner.access.set_contract(contract, active)?;
            Ok(format!("{contract}={active}"))
        })
        .await
    }

    /// Add or remove a whitelist entry.
    pub async fn set_whitelist(
        &self,
        caller: Address,
        identity: Address,
        active: bool,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_whitelist", |inner| {
            inner.access.set_whitelist(identity, active)?;
            Ok(format!("{identity}={active}"))
        })
        .await
    }

    /// Turn whitelist mode on or off.
    pub async fn set_only_whitelist(&self, caller: Address, enabled: bool) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_only_whitelist", |inner| {
            inner.access.set_only_whitelist(enabled);
            Ok(enabled.to_string())
        })
        .await
    }

    /// Pause or resume request creation.
    pub async fn set_pause(&self, caller: Address, paused: bool) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_pause", |inner| {
            inner.access.set_paused(paused);
            Ok(paused.to_string())
        })
        .await
    }

    /// Surcharge over execution cost, in basis points (at most 10000).
    pub async fn set_fulfill_fee(&self, caller: Address, bps: u32) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_fulfill_fee", |inner| {
            if bps > BPS_DENOMINATOR {
                return Err(RequestError::InvalidFulfillFee { bps });
            }
            inner.fees.fulfill_fee_bps = bps;
            Ok(bps.to_string())
        })
        .await
    }

    /// Absolute floor for request deposits.
    pub async fn set_min_fee_balance(
        &self,
        caller: Address,
        amount: Amount,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_min_fee_balance", |inner| {
            inner.fees.min_fee_balance = amount;
            Ok(amount.to_string())
        })
        .await
    }

    /// Floor for the controller-reported gas price.
    pub async fn set_min_gas_price(
        &self,
        caller: Address,
        gas_price: Amount,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_min_gas_price", |inner| {
            inner.fees.min_gas_price = gas_price;
            Ok(gas_price.to_string())
        })
        .await
    }

    /// Minimum units charged per fulfillment.
    pub async fn set_min_gas_limit(&self, caller: Address, units: u64) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_min_gas_limit", |inner| {
            inner.fees.min_gas_limit = units;
            Ok(units.to_string())
        })
        .await
    }

    /// Execution cost model: fixed, per attestation and per asset.
    pub async fn set_execution_units(
        &self,
        caller: Address,
        base: u64,
        per_signature: u64,
        per_asset: u64,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "set_execution_units", |inner| {
            inner.fees.base_units = base;
            inner.fees.units_per_signature = per_signature;
            inner.fees.units_per_asset = per_asset;
            Ok(format!("{base}/{per_signature}/{per_asset}"))
        })
        .await
    }

    /// Describe a feed.
    pub async fn register_feed(
        &self,
        caller: Address,
        asset_index: AssetIndex,
        description: String,
        decimals: u8,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "register_feed", |_| {
            let detail = format!("{asset_index}: {description} ({decimals})");
            self.feed
                .register_feed(asset_index, description, decimals)
                .map_err(|e| RequestError::InvalidFeed {
                    reason: e.to_string(),
                })?;
            Ok(detail)
        })
        .await
    }

    /// Hand administration to `new_owner`.
    pub async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RequestError> {
        self.apply_admin(caller, "transfer_ownership", |inner| {
            inner.access.transfer_ownership(new_owner)?;
            Ok(new_owner.to_string())
        })
        .await
    }
}
