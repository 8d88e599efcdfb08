//! # Message Relay Service
//!
//! Outbound: validate, collect the destination fee, assign a nonce.
//! Inbound: validate, check replay, verify quorum, commit the hash, then
//! hand the payload to the endpoint's mailbox.
//!
//! The fulfilled-hash set is committed before delivery and never shrinks.
//! A delivery failure is reported as an event; the hash stays fulfilled.

mod admin;
mod api;


use crate::domain::{RelayError, RelayState};
use crate::ports::outbound::{EndpointRouter, FeeController, FeeReceiver};
use parking_lot::RwLock;
use shared_bus::EventPublisher;
use shared_types::{Address, ChainId, Hash};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;
use xo_01_signer_registry::{AccessPolicy, RegistryError, SignerRegistry};
use xo_02_signature_verification::QuorumVerifier;

/// Default largest payload, in bytes.
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 64 * 1024;

/// Mutable state behind the relay lock.
pub(crate) struct RelayInner {
    pub(crate) access: AccessPolicy,
    pub(crate) fee_controller: Arc<dyn FeeController>,
    pub(crate) fee_receiver: Address,
    pub(crate) fulfilled: BTreeSet<Hash>,
    pub(crate) fulfill_count: u64,
    pub(crate) outbound_nonce: u64,
    pub(crate) max_payload_len: usize,
}

/// Cross-chain message relay for one chain.
pub struct MessageRelay {
    chain_id: ChainId,
    inner: RwLock<RelayInner>,
    signers: Arc<SignerRegistry>,
    verifier: QuorumVerifier,
    fees: Arc<dyn FeeReceiver>,
    endpoints: Arc<EndpointRouter>,
    events: Arc<dyn EventPublisher>,
}

impl MessageRelay {
    /// Relay serving `chain_id`, administered by `access.owner()`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: ChainId,
        access: AccessPolicy,
        signers: Arc<SignerRegistry>,
        fee_controller: Arc<dyn FeeController>,
        fee_receiver: Address,
        fees: Arc<dyn FeeReceiver>,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self, RelayError> {
        access.validate()?;
        if fee_controller.id().is_zero() || fee_receiver.is_zero() {
            return Err(RegistryError::InvalidAddress.into());
        }

        Ok(Self {
            chain_id,
            inner: RwLock::new(RelayInner {
                access,
                fee_controller,
                fee_receiver,
                fulfilled: BTreeSet::new(),
                fulfill_count: 0,
                outbound_nonce: 0,
                max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            }),
            verifier: QuorumVerifier::new(Arc::clone(&signers)),
            signers,
            fees,
            endpoints: Arc::new(EndpointRouter::default()),
            events,
        })
    }

    /// Use a shared endpoint router instead of the private default.
    pub fn with_endpoints(mut self, endpoints: Arc<EndpointRouter>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Start with a payload limit other than [`DEFAULT_MAX_PAYLOAD_LEN`].
    /// Zero is raised to one byte.
    pub fn with_max_payload_len(mut self, max: usize) -> Self {
        self.inner.get_mut().max_payload_len = max.max(1);
        self
    }

    /// Endpoint mailboxes.
    pub fn endpoints(&self) -> &Arc<EndpointRouter> {
        &self.endpoints
    }

    /// Signer set consulted by fulfillments.
    pub fn signer_registry(&self) -> &Arc<SignerRegistry> {
        &self.signers
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.inner.read().access.owner()
    }

    /// True if `identity` may fulfill.
    pub fn is_controller(&self, identity: &Address) -> bool {
        self.inner.read().access.is_controller(identity)
    }

    /// True if `identity` is whitelisted.
    pub fn is_whitelisted(&self, identity: &Address) -> bool {
        self.inner.read().access.is_whitelisted(identity)
    }

    /// Pause flag.
    pub fn is_paused(&self) -> bool {
        self.inner.read().access.is_paused()
    }

    /// True if `identity` may attest.
    pub fn is_signer(&self, identity: &Address) -> bool {
        self.signers.is_signer(identity)
    }

    /// Number of authorized signers.
    pub fn total_signers(&self) -> u32 {
        self.signers.total_signers()
    }

    /// Configured quorum threshold.
    pub fn threshold(&self) -> u32 {
        self.signers.threshold()
    }

    /// Current fee receiver.
    pub fn fee_receiver(&self) -> Address {
        self.inner.read().fee_receiver
    }

    /// Identity of the current fee controller.
    pub fn fee_controller(&self) -> Address {
        self.inner.read().fee_controller.id()
    }

    /// Last outbound nonce assigned.
    pub fn outbound_nonce(&self) -> u64 {
        self.inner.read().outbound_nonce
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Copy of the full relay state.
    pub fn export_state(&self) -> RelayState {
        let inner = self.inner.read();
        RelayState {
            access: inner.access.clone(),
            signers: self.signers.snapshot(),
            fee_receiver: inner.fee_receiver,
            fulfilled: inner.fulfilled.clone(),
            fulfill_count: inner.fulfill_count,
            outbound_nonce: inner.outbound_nonce,
            max_payload_len: inner.max_payload_len,
        }
    }

    /// Replace the full relay state after validating it. The fee
    /// controller is not part of the state and stays as configured.
    pub fn restore_state(&self, state: RelayState) -> Result<(), RelayError> {
        state.validate()?;

        let mut inner = self.inner.write();
        self.signers.restore(state.signers)?;
        inner.access = state.access;
        inner.fee_receiver = state.fee_receiver;
        inner.fulfilled = state.fulfilled;
        inner.fulfill_count = state.fulfill_count;
        inner.outbound_nonce = state.outbound_nonce;
        inner.max_payload_len = state.max_payload_len;

        info!(
            fulfill_count = inner.fulfill_count,
            outbound_nonce = inner.outbound_nonce,
            "Message relay restored"
        );
        Ok(())
    }
}
