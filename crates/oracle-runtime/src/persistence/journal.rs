//! # Commit Journal
//!
//! Both services publish through the journal instead of the bus directly.
//! When an event marks a committed change, the journal writes a fresh
//! snapshot before forwarding the event, so a caller that saw success can
//! lose power without the change being forgotten.
//!
//! ```text
//! service ── publish() ──→ CommitJournal ── is_commit? ──→ SnapshotStore
//!                               │
//!                               └──────────────────────→ InMemoryEventBus
//! ```
//!
//! Saves are serialized, and each one exports the services while holding
//! the save lock, so a later save never writes older state than an
//! earlier one.

use super::{PersistedState, PersistenceError, SnapshotStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{EventPublisher, InMemoryEventBus, OracleEvent};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, error};
use xo_05_request_registry::RequestRegistry;
use xo_06_message_relay::MessageRelay;

struct Services {
    price_oracle: Weak<RequestRegistry>,
    message_relay: Weak<MessageRelay>,
}

/// Event publisher that persists committed changes before announcing them.
pub struct CommitJournal {
    bus: Arc<InMemoryEventBus>,
    services: OnceLock<Services>,
    store: Mutex<Option<Arc<dyn SnapshotStore>>>,
}

impl CommitJournal {
    /// Journal in front of `bus`. Nothing is saved until services are
    /// bound and a store is attached.
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            bus,
            services: OnceLock::new(),
            store: Mutex::new(None),
        }
    }

    /// Services whose state is exported on every commit. Later calls are
    /// ignored.
    pub fn bind(&self, price_oracle: &Arc<RequestRegistry>, message_relay: &Arc<MessageRelay>) {
        let bound = self.services.set(Services {
            price_oracle: Arc::downgrade(price_oracle),
            message_relay: Arc::downgrade(message_relay),
        });
        if bound.is_err() {
            debug!("Journal already bound");
        }
    }

    /// Start saving to `store`. Attach after restore so the restored state
    /// is not immediately rewritten.
    pub fn attach(&self, store: Arc<dyn SnapshotStore>) {
        *self.store.lock() = Some(store);
    }

    /// True once a store is attached.
    pub fn is_attached(&self) -> bool {
        self.store.lock().is_some()
    }

    fn export(&self) -> Option<PersistedState> {
        let services = self.services.get()?;
        let price_oracle = services.price_oracle.upgrade()?;
        let message_relay = services.message_relay.upgrade()?;
        Some(PersistedState::new(
            price_oracle.export_state(),
            message_relay.export_state(),
        ))
    }

    /// Write the current state now. A detached or unbound journal has
    /// nothing to write and succeeds.
    pub fn checkpoint(&self) -> Result<(), PersistenceError> {
        let store = self.store.lock();
        let Some(store) = store.as_ref() else {
            return Ok(());
        };
        match self.export() {
            Some(state) => store.save_state(&state),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EventPublisher for CommitJournal {
    async fn publish(&self, event: OracleEvent) -> usize {
        if event.is_commit() {
            if let Err(e) = self.checkpoint() {
                error!(topic = ?event.topic(), error = %e, "Committed change not persisted");
            }
        }
        self.bus.publish(event).await
    }

    fn events_published(&self) -> u64 {
        self.bus.events_published()
    }
}
