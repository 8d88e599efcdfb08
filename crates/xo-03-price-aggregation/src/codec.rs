//! # Price Codec
//!
//! Packed `(u16 asset, u48 price)` records, both big-endian.

use crate::errors::PriceCodecError;
use shared_types::{AssetIndex, Price, MAX_ENCODED_PRICE};
use std::collections::BTreeSet;

/// Bytes per record.
pub const PRICE_RECORD_LEN: usize = 8;

/// One asset's price inside an attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PricePoint {
    /// Feed slot.
    pub asset_index: AssetIndex,
    /// Fixed-point price, 8 decimals.
    pub price: Price,
}

impl PricePoint {
    /// Convenience constructor.
    pub const fn new(asset_index: AssetIndex, price: Price) -> Self {
        Self { asset_index, price }
    }
}

/// Decode a packed price vector.
///
/// Empty input decodes to an empty vector. A repeated asset index is
/// rejected so one signer cannot vote twice for the same asset.
pub fn decode_prices(bytes: &[u8]) -> Result<Vec<PricePoint>, PriceCodecError> {
    if bytes.len() % PRICE_RECORD_LEN != 0 {
        return Err(PriceCodecError::InvalidLength { len: bytes.len() });
    }

    let mut seen = BTreeSet::new();
    let mut points = Vec::with_capacity(bytes.len() / PRICE_RECORD_LEN);

    for record in bytes.chunks_exact(PRICE_RECORD_LEN) {
        let asset_index = AssetIndex::from_be_bytes([record[0], record[1]]);

        let mut price_bytes = [0u8; 8];
        price_bytes[2..].copy_from_slice(&record[2..]);
        let price = Price::from_be_bytes(price_bytes);

        if !seen.insert(asset_index) {
            return Err(PriceCodecError::DuplicateAsset { asset_index });
        }
        points.push(PricePoint { asset_index, price });
    }

    Ok(points)
}

/// Encode a price vector in the packed wire form.
pub fn encode_prices(points: &[PricePoint]) -> Result<Vec<u8>, PriceCodecError> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(points.len() * PRICE_RECORD_LEN);

    for point in points {
        if point.price > MAX_ENCODED_PRICE {
            return Err(PriceCodecError::PriceOverflow {
                asset_index: point.asset_index,
                price: point.price,
            });
        }
        if !seen.insert(point.asset_index) {
            return Err(PriceCodecError::DuplicateAsset {
                asset_index: point.asset_index,
            });
        }
        out.extend_from_slice(&point.asset_index.to_be_bytes());
        out.extend_from_slice(&point.price.to_be_bytes()[2..]);
    }

    Ok(out)
}
