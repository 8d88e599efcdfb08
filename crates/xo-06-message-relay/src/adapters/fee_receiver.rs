//! Fee receiver that tallies credits in memory.

use crate::ports::outbound::{FeeReceiver, FeeTransferError};
use parking_lot::RwLock;
use shared_types::{Address, Amount};
use std::collections::BTreeMap;

/// Running total of fees credited to each receiver.
#[derive(Debug, Default)]
pub struct InMemoryFeeReceiver {
    received: RwLock<BTreeMap<Address, Amount>>,
}

impl InMemoryFeeReceiver {
    /// Empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total credited to `receiver`.
    pub fn received(&self, receiver: &Address) -> Amount {
        self.received.read().get(receiver).copied().unwrap_or(0)
    }
}

impl FeeReceiver for InMemoryFeeReceiver {
    fn transfer(
        &self,
        _payer: Address,
        receiver: Address,
        amount: Amount,
    ) -> Result<(), FeeTransferError> {
        let mut received = self.received.write();
        let total = received.entry(receiver).or_insert(0);
        *total = total
            .checked_add(amount)
            .ok_or_else(|| FeeTransferError(format!("balance overflow for {receiver}")))?;
        Ok(())
    }
}
