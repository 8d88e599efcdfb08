//! # Request Registry Service
//!
//! Owns the request lifecycle and fee ledger, and drives the signer
//! registry, quorum verifier and price feed on fulfillment.
//!
//! ## Locking
//!
//! One write lock serializes every mutation of requests, fees and roles.
//! Events and callbacks are sent after the lock is released; nothing is
//! awaited while it is held.
//!
//! ```text
//! fulfill_request
//!   ├─ inner.write()          caller, status, expiration
//!   ├─ QuorumVerifier         parallel recovery, dedupe, threshold
//!   ├─ aggregate              per-asset median
//!   ├─ PriceFeedStore         ordered writes, stale assets skipped
//!   ├─ FeeLedger::settle      requester -> controller
//!   └─ (lock released) publish events, deliver PriceCallback
//! ```

mod admin;
mod api;


use crate::domain::{FeeLedger, FeeSchedule, RegistryState, Request, RequestError};
use crate::ports::outbound::CallbackRouter;
use parking_lot::RwLock;
use shared_bus::EventPublisher;
use shared_types::{Address, Amount, AssetIndex, RequestId, TimeSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use xo_01_signer_registry::{AccessPolicy, SignerRegistry};
use xo_02_signature_verification::QuorumVerifier;
use xo_04_price_feed::{FeedMetadata, PriceFeedStore};

/// Mutable state behind the registry lock.
#[derive(Debug)]
pub(crate) struct RegistryInner {
    pub(crate) access: AccessPolicy,
    pub(crate) fees: FeeSchedule,
    pub(crate) ledger: FeeLedger,
    pub(crate) requests: BTreeMap<RequestId, Request>,
    pub(crate) latest_request_id: RequestId,
}

/// Price request registry.
///
/// Thread-safe; share it behind an `Arc`.
pub struct RequestRegistry {
    inner: RwLock<RegistryInner>,
    signers: Arc<SignerRegistry>,
    verifier: QuorumVerifier,
    feed: Arc<PriceFeedStore>,
    callbacks: Arc<CallbackRouter>,
    clock: Arc<dyn TimeSource>,
    events: Arc<dyn EventPublisher>,
}

impl RequestRegistry {
    /// Registry administered by `access.owner()`.
    pub fn new(
        access: AccessPolicy,
        fees: FeeSchedule,
        signers: Arc<SignerRegistry>,
        feed: Arc<PriceFeedStore>,
        clock: Arc<dyn TimeSource>,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self, RequestError> {
        access.validate()?;
        fees.validate()?;

        Ok(Self {
            inner: RwLock::new(RegistryInner {
                access,
                fees,
                ledger: FeeLedger::new(),
                requests: BTreeMap::new(),
                latest_request_id: 0,
            }),
            verifier: QuorumVerifier::new(Arc::clone(&signers)),
            signers,
            feed,
            callbacks: Arc::new(CallbackRouter::default()),
            clock,
            events,
        })
    }

    /// Use a shared callback router instead of the private default.
    pub fn with_callbacks(mut self, callbacks: Arc<CallbackRouter>) -> Self {
        self.callbacks = callbacks;
        self
    }

    // =========================================================================
    // COLLABORATORS
    // =========================================================================

    /// Mailboxes that receive price callbacks.
    pub fn callbacks(&self) -> &Arc<CallbackRouter> {
        &self.callbacks
    }

    /// Signer set consulted by fulfillments.
    pub fn signer_registry(&self) -> &Arc<SignerRegistry> {
        &self.signers
    }

    /// Feed written by fulfillments.
    pub fn feed(&self) -> &Arc<PriceFeedStore> {
        &self.feed
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.inner.read().access.owner()
    }

    /// True if `identity` may fulfill and refund.
    pub fn is_controller(&self, identity: &Address) -> bool {
        self.inner.read().access.is_controller(identity)
    }

    /// True if `identity` may open requests.
    pub fn is_contract(&self, identity: &Address) -> bool {
        self.inner.read().access.is_contract(identity)
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

    /// Total fee balance of `owner`, reserved or not.
    pub fn fee_balance(&self, owner: &Address) -> Amount {
        self.inner.read().ledger.balance(owner)
    }

    /// Fee balance of `owner` not held by open requests.
    pub fn available_fee_balance(&self, owner: &Address) -> Amount {
        self.inner.read().ledger.available(owner)
    }

    /// Current fee parameters.
    pub fn fee_schedule(&self) -> FeeSchedule {
        self.inner.read().fees.clone()
    }

    /// Fee for `units` of execution at `gas_price`, including surcharge.
    pub fn estimate_fee(&self, units: u64, gas_price: Amount) -> Amount {
        self.inner.read().fees.estimate_fee(units, gas_price)
    }

    /// Smallest deposit a request may carry right now.
    pub fn minimum_fee(&self) -> Amount {
        self.inner.read().fees.minimum_fee()
    }

    /// Decimals of a feed.
    pub fn get_decimals(&self, asset_index: AssetIndex) -> u8 {
        self.feed.get_decimals(asset_index)
    }

    /// Registered feed description.
    pub fn feed_info(&self, asset_index: AssetIndex) -> Option<FeedMetadata> {
        self.feed.feed_info(asset_index)
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Copy of the full registry state.
    pub fn export_state(&self) -> RegistryState {
        let inner = self.inner.read();
        RegistryState {
            access: inner.access.clone(),
            signers: self.signers.snapshot(),
            fees: inner.fees.clone(),
            ledger: inner.ledger.clone(),
            requests: inner.requests.clone(),
            latest_request_id: inner.latest_request_id,
            feed: self.feed.snapshot(),
        }
    }

    /// Replace the full registry state after validating it.
    pub fn restore_state(&self, state: RegistryState) -> Result<(), RequestError> {
        state.validate()?;

        let mut inner = self.inner.write();
        self.signers.restore(state.signers)?;
        self.feed.restore(state.feed);
        *inner = RegistryInner {
            access: state.access,
            fees: state.fees,
            ledger: state.ledger,
            requests: state.requests,
            latest_request_id: state.latest_request_id,
        };

        info!(
            latest_request_id = inner.latest_request_id,
            requests = inner.requests.len(),
            "Request registry restored"
        );
        Ok(())
    }
}
