//! # Price Feed Store
//!
//! Lock-protected per-asset cache. Reads never block each other; a write
//! holds the lock only for the compare-and-set of one entry.

use crate::domain::entities::{FeedMetadata, FeedSnapshot, PriceFeedEntry};
use crate::domain::errors::FeedError;
use parking_lot::RwLock;
use shared_types::{AssetIndex, Price, RequestId, Timestamp, PRICE_DECIMALS};
use tracing::{debug, info};

/// Latest-value cache keyed by asset index.
#[derive(Debug, Default)]
pub struct PriceFeedStore {
    state: RwLock<FeedSnapshot>,
}

impl PriceFeedStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a consensus price.
    ///
    /// `request_timestamp` is the originating request's creation time and
    /// `updated_at` the time of this write. Returns the new entry.
    pub fn update(
        &self,
        asset_index: AssetIndex,
        price: Price,
        source_request_id: RequestId,
        request_timestamp: Timestamp,
        updated_at: Timestamp,
    ) -> Result<PriceFeedEntry, FeedError> {
        let mut state = self.state.write();
        let entry = state.entries.entry(asset_index).or_default();

        if entry.round > 0 && source_request_id <= entry.source_request_id {
            debug!(
                asset_index,
                current = entry.source_request_id,
                attempted = source_request_id,
                "Rejecting stale feed write"
            );
            return Err(FeedError::StaleUpdate {
                asset_index,
                current: entry.source_request_id,
                attempted: source_request_id,
            });
        }

        entry.round += 1;
        entry.price = price;
        entry.latest_price = price;
        entry.updated_at = updated_at;
        entry.source_request_id = source_request_id;
        entry.request_timestamp = request_timestamp;

        Ok(*entry)
    }

    /// Latest entry for `asset_index`, zero-valued if never written.
    pub fn read(&self, asset_index: AssetIndex) -> PriceFeedEntry {
        self.state
            .read()
            .entries
            .get(&asset_index)
            .copied()
            .unwrap_or_default()
    }

    /// Record or replace a feed's description.
    pub fn register_feed(
        &self,
        asset_index: AssetIndex,
        description: impl Into<String>,
        decimals: u8,
    ) -> Result<(), FeedError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(FeedError::InvalidDescription { asset_index });
        }
        info!(asset_index, %description, decimals, "Feed registered");
        self.state.write().metadata.insert(
            asset_index,
            FeedMetadata {
                description,
                decimals,
            },
        );
        Ok(())
    }

    /// Registered metadata, if any.
    pub fn feed_info(&self, asset_index: AssetIndex) -> Option<FeedMetadata> {
        self.state.read().metadata.get(&asset_index).cloned()
    }

    /// Decimals of `asset_index`; unregistered feeds use the default 8.
    pub fn get_decimals(&self, asset_index: AssetIndex) -> u8 {
        self.state
            .read()
            .metadata
            .get(&asset_index)
            .map_or(PRICE_DECIMALS, |m| m.decimals)
    }

    /// Number of assets ever written.
    pub fn asset_count(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Copy of the full contents.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.state.read().clone()
    }

    /// Replace the full contents.
    pub fn restore(&self, snapshot: FeedSnapshot) {
        *self.state.write() = snapshot;
    }
}
