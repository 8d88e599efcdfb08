//! # Publishing
//!
//! Services never see the bus type. They hold an `Arc<dyn EventPublisher>`
//! so the runtime can put a journal or any other decorator in front of the
//! broadcast channel.

use crate::events::{EventFilter, OracleEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Sink for service side effects.
///
/// Called after the service has released its state lock, so an
/// implementation may read service state.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand `event` on; returns how many subscribers got it.
    async fn publish(&self, event: OracleEvent) -> usize;

    /// Publish one call's events in order. Returns total deliveries.
    async fn publish_all(&self, events: Vec<OracleEvent>) -> usize {
        let mut delivered = 0;
        for event in events {
            delivered += self.publish(event).await;
        }
        delivered
    }

    /// Events accepted since construction, delivered or not.
    fn events_published(&self) -> u64;
}

/// Broadcast fan-out to every live [`Subscription`] and [`EventStream`].
///
/// Each receiver buffers up to `capacity` events; a receiver that falls
/// further behind loses the oldest ones.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<OracleEvent>,
    published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Pull-style receiver; only events published after this call arrive.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, sources = ?filter.sources, "Subscriber attached");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Same as [`subscribe`](Self::subscribe), as a `Stream`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: OracleEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        let (topic, source) = (event.topic(), event.source());

        // send only fails when nobody is listening
        let receivers = self.sender.send(event).unwrap_or(0);
        if receivers == 0 {
            trace!(?topic, ?source, "No subscribers, event dropped");
        } else {
            debug!(?topic, ?source, receivers, "Event broadcast");
        }
        receivers
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
