//! # Price Feed Subsystem (XO-04)
//!
//! Latest consensus price per asset index.
//!
//! ## Ordering
//!
//! Each entry remembers the request that produced it. A write from a request
//! whose id is not strictly greater is rejected with `StaleUpdate`, so
//! fulfilling requests out of order never rolls a feed back.

pub mod domain;
pub mod store;

pub use domain::entities::{FeedMetadata, FeedSnapshot, PriceFeedEntry};
pub use domain::errors::FeedError;
pub use store::PriceFeedStore;
