//! # Shared Bus - Event Bus and Mailboxes
//!
//! Two delivery styles connect the oracle services to the outside world:
//!
//! - **Broadcast events** (`publisher`, `subscriber`): request, feed and
//!   message side effects fan out to relayer observers, audit logs and
//!   metrics.
//! - **Point-to-point mailboxes** (`mailbox`): fulfilled messages and price
//!   callbacks are handed to their destination handler by value.
//!
//! ```text
//! ┌────────────────┐   publish()    ┌──────────────┐  subscribe()  ┌──────────┐
//! │ RequestRegistry│ ─────────────→ │  Event Bus   │ ────────────→ │ Relayers │
//! │ MessageRelay   │                └──────────────┘               └──────────┘
//! │                │   deliver()    ┌──────────────┐    recv()     ┌──────────┐
//! │                │ ─────────────→ │ MailboxRouter│ ────────────→ │ Endpoint │
//! └────────────────┘                └──────────────┘               └──────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod mailbox;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventSource, EventTopic, OracleEvent};
pub use mailbox::{MailboxError, MailboxRouter};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
