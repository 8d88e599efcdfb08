//! # Aggregation
//!
//! Groups accepted signers' vectors by asset and takes the median of each
//! group that has enough submissions.

use crate::codec::PricePoint;
use crate::median::median;
use shared_types::{AssetIndex, Price};
use std::collections::BTreeMap;
use tracing::debug;

/// Values submitted per asset, in signer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSubmissions {
    values: BTreeMap<AssetIndex, Vec<Price>>,
}

impl AssetSubmissions {
    /// Empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one signer's vector.
    pub fn push(&mut self, points: &[PricePoint]) {
        for point in points {
            self.values
                .entry(point.asset_index)
                .or_default()
                .push(point.price);
        }
    }

    /// Number of submissions recorded for `asset_index`.
    pub fn count(&self, asset_index: AssetIndex) -> usize {
        self.values.get(&asset_index).map_or(0, Vec::len)
    }

    /// Median per asset, dropping assets with fewer than `min_submissions`
    /// values.
    pub fn consensus(&self, min_submissions: u32) -> BTreeMap<AssetIndex, Price> {
        let min = usize::try_from(min_submissions).unwrap_or(usize::MAX);
        self.values
            .iter()
            .filter_map(|(asset_index, values)| {
                if values.len() < min {
                    debug!(
                        asset_index,
                        submissions = values.len(),
                        required = min_submissions,
                        "Asset below quorum, skipping"
                    );
                    return None;
                }
                median(values).map(|price| (*asset_index, price))
            })
            .collect()
    }
}

/// Consensus prices from per-signer vectors.
pub fn aggregate<'a, I>(vectors: I, min_submissions: u32) -> BTreeMap<AssetIndex, Price>
where
    I: IntoIterator<Item = &'a [PricePoint]>,
{
    let mut submissions = AssetSubmissions::new();
    for points in vectors {
        submissions.push(points);
    }
    submissions.consensus(min_submissions)
}
