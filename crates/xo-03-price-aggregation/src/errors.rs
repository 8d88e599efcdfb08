//! # Codec Errors

use shared_types::{AssetIndex, Price};
use thiserror::Error;

/// Malformed encoded price vectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceCodecError {
    /// Byte length is not a whole number of records.
    #[error("encoded prices length {len} is not a multiple of 8")]
    InvalidLength {
        /// Received length.
        len: usize,
    },

    /// The same asset appears twice in one vector.
    #[error("duplicate asset index {asset_index}")]
    DuplicateAsset {
        /// Repeated asset.
        asset_index: AssetIndex,
    },

    /// Price does not fit in 48 bits.
    #[error("price {price} for asset {asset_index} exceeds 48 bits")]
    PriceOverflow {
        /// Offending asset.
        asset_index: AssetIndex,
        /// Offending price.
        price: Price,
    },
}
