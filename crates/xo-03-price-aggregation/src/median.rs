//! Median of a price list.

use shared_types::Price;

/// Median of `values`, `None` when empty.
///
/// Odd length takes the middle element. Even length takes
/// `floor((lo + hi) / 2)` computed without overflow.
pub fn median(values: &[Price]) -> Option<Price> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return Some(sorted[mid]);
    }

    let (lo, hi) = (sorted[mid - 1], sorted[mid]);
    Some(lo / 2 + hi / 2 + (lo % 2 + hi % 2) / 2)
}
