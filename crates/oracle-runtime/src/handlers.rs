//! # Event Handlers
//!
//! Bus subscribers that run beside the services. None of them can affect
//! service state; a slow handler only lags its own subscription.

use oracle_telemetry::OracleMetrics;
use shared_bus::{EventFilter, InMemoryEventBus, OracleEvent, Subscription};
use tracing::{debug, info};

/// Update counters for one event.
pub fn record(metrics: &OracleMetrics, event: &OracleEvent) {
    match event {
        OracleEvent::RequestCreated { .. } => metrics.requests_created.inc(),
        OracleEvent::FulfillRequest { success, .. } => {
            let outcome = if *success { "fulfilled" } else { "rejected" };
            metrics.fulfillments.with_label_values(&[outcome]).inc();
        }
        OracleEvent::StaleUpdateSkipped { .. } => metrics.stale_updates.inc(),
        OracleEvent::MessageSent { .. } => metrics.messages_sent.inc(),
        OracleEvent::MessageFulfilled { .. } => metrics.messages_fulfilled.inc(),
        OracleEvent::MessageDeliveryFailed { .. } => metrics.delivery_failures.inc(),
        OracleEvent::AdminChanged { source, .. } => {
            let source = format!("{source:?}");
            metrics.admin_changes.with_label_values(&[&source]).inc();
        }
        OracleEvent::PriceUpdated { .. }
        | OracleEvent::FeeSettled { .. }
        | OracleEvent::FeeDeposited { .. }
        | OracleEvent::FeeWithdrawn { .. }
        | OracleEvent::RequestCancelled { .. }
        | OracleEvent::RequestRefunded { .. } => {}
    }
}

/// Counts every event into Prometheus and writes admin changes to the
/// audit log.
pub struct MetricsHandler {
    events: Subscription,
    metrics: &'static OracleMetrics,
}

impl MetricsHandler {
    /// Subscribe to everything on `bus`.
    pub fn new(bus: &InMemoryEventBus, metrics: &'static OracleMetrics) -> Self {
        Self {
            events: bus.subscribe(EventFilter::all()),
            metrics,
        }
    }

    /// Run until the bus closes.
    pub async fn run(mut self) {
        info!("Metrics handler started");
        while let Some(event) = self.events.recv().await {
            record(self.metrics, &event);
            match &event {
                OracleEvent::AdminChanged {
                    source,
                    action,
                    detail,
                } => info!(target: "audit", ?source, %action, %detail, "Configuration changed"),
                other => debug!(topic = ?other.topic(), "Event observed"),
            }
        }
        info!("Metrics handler stopped");
    }
}
