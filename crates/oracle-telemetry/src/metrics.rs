//! Prometheus metrics for the oracle services.
//!
//! All metrics follow the naming convention: `xo_<component>_<metric>_total`.
//! Every metric here is a counter; the services never decrement anything
//! an operator would graph.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

/// Counters exported by an oracle node.
pub struct OracleMetrics {
    registry: Registry,

    // =========================================================================
    // PRICE ORACLE
    // =========================================================================
    /// Price requests accepted.
    pub requests_created: IntCounter,
    /// Fulfillment attempts, labelled `outcome` = fulfilled/rejected.
    pub fulfillments: IntCounterVec,
    /// Assets skipped because a newer request already wrote them.
    pub stale_updates: IntCounter,

    // =========================================================================
    // MESSAGE RELAY
    // =========================================================================
    /// Messages accepted for cross-chain delivery.
    pub messages_sent: IntCounter,
    /// Inbound messages that reached quorum.
    pub messages_fulfilled: IntCounter,
    /// Fulfilled messages the endpoint mailbox refused.
    pub delivery_failures: IntCounter,

    // =========================================================================
    // ADMIN
    // =========================================================================
    /// Configuration changes, labelled by `source` service.
    pub admin_changes: IntCounterVec,
}

impl OracleMetrics {
    /// Create every counter and register it with a fresh registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_created = IntCounter::new(
            "xo_oracle_requests_created_total",
            "Price requests accepted",
        )?;
        let fulfillments = IntCounterVec::new(
            Opts::new("xo_oracle_fulfillments_total", "Price fulfillment attempts"),
            &["outcome"],
        )?;
        let stale_updates = IntCounter::new(
            "xo_feed_stale_updates_total",
            "Asset writes skipped as stale",
        )?;
        let messages_sent = IntCounter::new(
            "xo_relay_messages_sent_total",
            "Messages accepted for cross-chain delivery",
        )?;
        let messages_fulfilled = IntCounter::new(
            "xo_relay_messages_fulfilled_total",
            "Inbound messages fulfilled",
        )?;
        let delivery_failures = IntCounter::new(
            "xo_relay_delivery_failures_total",
            "Fulfilled messages not delivered to their endpoint",
        )?;
        let admin_changes = IntCounterVec::new(
            Opts::new("xo_admin_changes_total", "Configuration changes"),
            &["source"],
        )?;

        registry.register(Box::new(requests_created.clone()))?;
        registry.register(Box::new(fulfillments.clone()))?;
        registry.register(Box::new(stale_updates.clone()))?;
        registry.register(Box::new(messages_sent.clone()))?;
        registry.register(Box::new(messages_fulfilled.clone()))?;
        registry.register(Box::new(delivery_failures.clone()))?;
        registry.register(Box::new(admin_changes.clone()))?;

        Ok(Self {
            registry,
            requests_created,
            fulfillments,
            stale_updates,
            messages_sent,
            messages_fulfilled,
            delivery_failures,
            admin_changes,
        })
    }

    /// Render every registered metric in the text exposition format.
    pub fn gather(&self) -> Result<String, TelemetryError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

lazy_static! {
    static ref METRICS: Result<OracleMetrics, String> =
        OracleMetrics::new().map_err(|e| e.to_string());
}

/// Process-wide counters, created on first use.
pub fn metrics() -> Result<&'static OracleMetrics, TelemetryError> {
    METRICS
        .as_ref()
        .map_err(|e| TelemetryError::Metrics(e.clone()))
}

/// Create the process-wide counters now instead of on first use.
pub fn register_metrics() -> Result<(), TelemetryError> {
    metrics().map(|_| ())
}

/// Render the process-wide counters in the text exposition format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    metrics()?.gather()
}
