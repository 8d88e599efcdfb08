//! # Feed Errors

use shared_types::{AssetIndex, ErrorKind, RequestId};
use thiserror::Error;

/// Feed write failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// A newer request already wrote this asset.
    #[error("stale update for asset {asset_index}: request {attempted} <= {current}")]
    StaleUpdate {
        /// Asset left untouched.
        asset_index: AssetIndex,
        /// Request id already stored.
        current: RequestId,
        /// Request id that was rejected.
        attempted: RequestId,
    },

    /// Feed metadata with an empty description.
    #[error("invalid feed description for asset {asset_index}")]
    InvalidDescription {
        /// Asset being registered.
        asset_index: AssetIndex,
    },
}

impl FeedError {
    /// Taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::StaleUpdate { .. } => ErrorKind::State,
            FeedError::InvalidDescription { .. } => ErrorKind::Validation,
        }
    }
}
