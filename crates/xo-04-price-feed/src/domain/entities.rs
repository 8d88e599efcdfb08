//! # Feed Entities

use serde::{Deserialize, Serialize};
use shared_types::{AssetIndex, Price, RequestId, Timestamp, PRICE_DECIMALS};
use std::collections::BTreeMap;

/// Latest value for one asset.
///
/// The zero value is what readers see for an asset nobody has written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeedEntry {
    /// Number of accepted writes.
    pub round: u64,
    /// Consensus price of the latest round.
    pub price: Price,
    /// Mirror of `price` for consumers that read the latest answer.
    pub latest_price: Price,
    /// Time of the latest write.
    pub updated_at: Timestamp,
    /// Request that produced the latest write.
    pub source_request_id: RequestId,
    /// Creation time of that request (the time the signers attested to).
    pub request_timestamp: Timestamp,
}

/// Human-facing description of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMetadata {
    /// e.g. "BTC/USD Price Feed".
    pub description: String,
    /// Fixed-point decimals of the price.
    pub decimals: u8,
}

impl Default for FeedMetadata {
    fn default() -> Self {
        Self {
            description: String::new(),
            decimals: PRICE_DECIMALS,
        }
    }
}

/// Full store contents, for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// Per-asset latest values.
    pub entries: BTreeMap<AssetIndex, PriceFeedEntry>,
    /// Registered feed descriptions.
    pub metadata: BTreeMap<AssetIndex, FeedMetadata>,
}
