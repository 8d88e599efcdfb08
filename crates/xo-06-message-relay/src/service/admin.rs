//! Owner-only configuration. Every setter emits `AdminChanged`.

use super::{MessageRelay, RelayInner};
use crate::domain::RelayError;
use crate::ports::outbound::FeeController;
use shared_bus::{EventSource, OracleEvent};
use shared_types::Address;
use std::sync::Arc;
use tracing::info;
use xo_01_signer_registry::RegistryError;

impl MessageRelay {
    async fn apply_admin<F>(
        &self,
        caller: Address,
        action: &'static str,
        apply: F,
    ) -> Result<(), RelayError>
    where
        F: FnOnce(&mut RelayInner) -> Result<String, RelayError>,
    {
        let detail = {
            let mut inner = self.inner.write();
            inner.access.ensure_owner(&caller)?;
            apply(&mut *inner)?
        };

        info!(action, %detail, "Message relay configuration changed");
        self.events
            .publish(OracleEvent::AdminChanged {
                source: EventSource::MessageRelay,
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
    ) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_signer", |_| {
            self.signers.set_signer(signer, active)?;
            Ok(format!("{signer}={active}"))
        })
        .await
    }

    /// Set the quorum threshold.
    pub async fn set_threshold(&self, caller: Address, threshold: u32) -> Result<(), RelayError> {
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
    ) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_controller", |inner| {
            inner.access.set_controller(controller, active)?;
            Ok(format!("{controller}={active}"))
        })
        .await
    }

    /// Register or unregister a sending contract.
    pub async fn set_contract(
        &self,
        caller: Address,
        contract: Address,
        active: bool,
    ) -> Result<(), RelayError> {
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
    ) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_whitelist", |inner| {
            inner.access.set_whitelist(identity, active)?;
            Ok(format!("{identity}={active}"))
        })
        .await
    }

    /// Turn whitelist mode on or off.
    pub async fn set_only_whitelist(&self, caller: Address, enabled: bool) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_only_whitelist", |inner| {
            inner.access.set_only_whitelist(enabled);
            Ok(enabled.to_string())
        })
        .await
    }

    /// Pause or resume sending. Fulfillment is not affected.
    pub async fn set_pause(&self, caller: Address, paused: bool) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_pause", |inner| {
            inner.access.set_paused(paused);
            Ok(paused.to_string())
        })
        .await
    }

    /// Replace the per-destination fee lookup.
    pub async fn set_fee_controller(
        &self,
        caller: Address,
        controller: Arc<dyn FeeController>,
    ) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_fee_controller", |inner| {
            let id = controller.id();
            if id.is_zero() {
                return Err(RegistryError::InvalidAddress.into());
            }
            inner.fee_controller = controller;
            Ok(id.to_string())
        })
        .await
    }

    /// Destination of send fees.
    pub async fn set_fee_receiver(
        &self,
        caller: Address,
        receiver: Address,
    ) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_fee_receiver", |inner| {
            if receiver.is_zero() {
                return Err(RegistryError::InvalidAddress.into());
            }
            inner.fee_receiver = receiver;
            Ok(receiver.to_string())
        })
        .await
    }

    /// Largest payload accepted by send and fulfill.
    pub async fn set_max_payload_len(&self, caller: Address, max: usize) -> Result<(), RelayError> {
        self.apply_admin(caller, "set_max_payload_len", |inner| {
            if max == 0 {
                return Err(RelayError::InvalidPayload);
            }
            inner.max_payload_len = max;
            Ok(max.to_string())
        })
        .await
    }

    /// Hand administration to `new_owner`.
    pub async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RelayError> {
        self.apply_admin(caller, "transfer_ownership", |inner| {
            inner.access.transfer_ownership(new_owner)?;
            Ok(new_owner.to_string())
        })
        .await
    }
}
