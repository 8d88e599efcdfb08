//! Table-driven fee controller.

use crate::ports::outbound::FeeController;
use parking_lot::RwLock;
use shared_types::{Address, Amount, ChainId};
use std::collections::BTreeMap;
use tracing::info;

/// Fixed fee per destination chain, editable at runtime.
#[derive(Debug)]
pub struct StaticFeeController {
    id: Address,
    fees: RwLock<BTreeMap<ChainId, Amount>>,
}

impl StaticFeeController {
    /// Controller with no destinations.
    pub fn new(id: Address) -> Self {
        Self {
            id,
            fees: RwLock::new(BTreeMap::new()),
        }
    }

    /// Controller seeded from configuration.
    pub fn with_fees(id: Address, fees: impl IntoIterator<Item = (ChainId, Amount)>) -> Self {
        Self {
            id,
            fees: RwLock::new(fees.into_iter().collect()),
        }
    }

    /// Set the fee for `dst_chain_id`, making it a known destination.
    pub fn set_fee(&self, dst_chain_id: ChainId, fee: Amount) {
        self.fees.write().insert(dst_chain_id, fee);
        info!(dst_chain_id, fee, "Destination fee set");
    }

    /// Forget `dst_chain_id`.
    pub fn remove_fee(&self, dst_chain_id: ChainId) -> bool {
        self.fees.write().remove(&dst_chain_id).is_some()
    }
}

impl FeeController for StaticFeeController {
    fn id(&self) -> Address {
        self.id
    }

    fn fee(&self, dst_chain_id: ChainId) -> Option<Amount> {
        self.fees.read().get(&dst_chain_id).copied()
    }
}
