//! # Service Container
//!
//! Builds both services from configuration and holds the shared
//! infrastructure they publish to.
//!
//! ```text
//! OracleConfig
//!   ├─ price_oracle ──→ SignerRegistry ─┐
//!   │                   PriceFeedStore ─┼─→ RequestRegistry ──┐
//!   │                   CallbackRouter ─┘                     │
//!   └─ message_relay ─→ SignerRegistry ─┐                     ├─→ CommitJournal ─→ InMemoryEventBus
//!                       StaticFeeController ─┼─→ MessageRelay ┘
//!                       EndpointRouter ─┘
//! ```
//!
//! Each service gets its own signer registry; the two quorums are
//! administered independently.

use crate::config::OracleConfig;
use crate::persistence::{CommitJournal, PersistedState};
use shared_bus::InMemoryEventBus;
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};
use xo_01_signer_registry::{RegistryError, SignerRegistry};
use xo_04_price_feed::{FeedError, PriceFeedStore};
use xo_05_request_registry::{CallbackRouter, RequestError, RequestRegistry};
use xo_06_message_relay::{
    EndpointRouter, InMemoryFeeReceiver, MessageRelay, RelayError, StaticFeeController,
};

/// Failures while building or restoring services.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Role or signer configuration rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Feed metadata rejected.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Price oracle rejected its configuration or snapshot.
    #[error("price oracle: {0}")]
    PriceOracle(#[from] RequestError),

    /// Message relay rejected its configuration or snapshot.
    #[error("message relay: {0}")]
    MessageRelay(#[from] RelayError),
}

/// Central container holding both services.
pub struct OracleContainer {
    // =========================================================================
    // SERVICES
    // =========================================================================
    /// Price request lifecycle and feed.
    pub price_oracle: Arc<RequestRegistry>,

    /// Cross-chain message send and fulfill.
    pub message_relay: Arc<MessageRelay>,

    // =========================================================================
    // SHARED INFRASTRUCTURE
    // =========================================================================
    /// Every service event flows through this bus.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Publisher both services hold; persists commits, then forwards to
    /// `event_bus`.
    pub journal: Arc<CommitJournal>,

    /// Consumer mailboxes for price callbacks.
    pub callbacks: Arc<CallbackRouter>,

    /// Endpoint mailboxes for fulfilled messages.
    pub endpoints: Arc<EndpointRouter>,

    /// Per-destination send fees.
    pub fee_controller: Arc<StaticFeeController>,

    /// Tally of collected send fees.
    pub fee_receiver: Arc<InMemoryFeeReceiver>,

    /// Configuration the services were built from.
    pub config: OracleConfig,
}

impl OracleContainer {
    /// Build both services on the system clock.
    pub fn new(config: OracleConfig) -> Result<Self, ContainerError> {
        Self::with_clock(config, Arc::new(SystemTimeSource))
    }

    /// Build both services on `clock`.
    #[instrument(name = "container_init", skip_all, fields(chain_id = config.chain.chain_id))]
    pub fn with_clock(
        config: OracleConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, ContainerError> {
        let event_bus = Arc::new(InMemoryEventBus::new());
        let journal = Arc::new(CommitJournal::new(event_bus.clone()));
        let callbacks = Arc::new(CallbackRouter::default());
        let endpoints = Arc::new(EndpointRouter::default());

        // =====================================================================
        // PRICE ORACLE
        // =====================================================================
        let oracle = &config.price_oracle;
        let feed = Arc::new(PriceFeedStore::new());
        for entry in &oracle.feeds {
            feed.register_feed(entry.asset_index, entry.description.clone(), entry.decimals)?;
        }
        let price_oracle = RequestRegistry::new(
            oracle.access.build()?,
            oracle.fees.clone(),
            Arc::new(SignerRegistry::new(oracle.quorum.build()?)),
            feed,
            clock,
            journal.clone(),
        )?
        .with_callbacks(callbacks.clone());
        info!(
            signers = price_oracle.total_signers(),
            threshold = price_oracle.threshold(),
            feeds = oracle.feeds.len(),
            "Price oracle initialized"
        );

        // =====================================================================
        // MESSAGE RELAY
        // =====================================================================
        let relay = &config.message_relay;
        let fee_controller = Arc::new(StaticFeeController::with_fees(
            relay.fee_controller_id(),
            relay.destination_fees.iter().map(|d| (d.chain_id, d.fee)),
        ));
        let fee_receiver = Arc::new(InMemoryFeeReceiver::new());
        let message_relay = MessageRelay::new(
            config.chain.chain_id,
            relay.access.build()?,
            Arc::new(SignerRegistry::new(relay.quorum.build()?)),
            fee_controller.clone(),
            relay.fee_receiver,
            fee_receiver.clone(),
            journal.clone(),
        )?
        .with_endpoints(endpoints.clone())
        .with_max_payload_len(relay.max_payload_len);
        info!(
            signers = message_relay.total_signers(),
            threshold = message_relay.threshold(),
            destinations = relay.destination_fees.len(),
            "Message relay initialized"
        );

        let price_oracle = Arc::new(price_oracle);
        let message_relay = Arc::new(message_relay);
        journal.bind(&price_oracle, &message_relay);

        Ok(Self {
            price_oracle,
            message_relay,
            event_bus,
            journal,
            callbacks,
            endpoints,
            fee_controller,
            fee_receiver,
            config,
        })
    }

    /// Export both services.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState::new(
            self.price_oracle.export_state(),
            self.message_relay.export_state(),
        )
    }

    /// Replace both services' state. Each service validates its half
    /// before accepting it; the relay half is checked before the oracle
    /// half is applied so a bad snapshot changes nothing.
    pub fn restore(&self, state: PersistedState) -> Result<(), ContainerError> {
        state.message_relay.validate()?;
        self.price_oracle.restore_state(state.price_oracle)?;
        self.message_relay.restore_state(state.message_relay)?;
        Ok(())
    }
}
