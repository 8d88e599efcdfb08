//! Serializable contents of a request registry.

use super::errors::RequestError;
use super::fees::{FeeLedger, FeeSchedule};
use super::request::{Request, RequestStatus};
use serde::{Deserialize, Serialize};
use shared_types::RequestId;
use std::collections::BTreeMap;
use xo_01_signer_registry::{AccessPolicy, SignerSet};
use xo_04_price_feed::FeedSnapshot;

/// Everything a registry needs to resume after restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Roles and flags.
    pub access: AccessPolicy,
    /// Authorized attesters.
    pub signers: SignerSet,
    /// Fee parameters.
    pub fees: FeeSchedule,
    /// Balances and reservations.
    pub ledger: FeeLedger,
    /// All requests ever created.
    pub requests: BTreeMap<RequestId, Request>,
    /// Highest id allocated.
    pub latest_request_id: RequestId,
    /// Price feed contents.
    pub feed: FeedSnapshot,
}

impl RegistryState {
    /// Check cross-field invariants before the state is accepted.
    pub fn validate(&self) -> Result<(), RequestError> {
        self.access.validate()?;
        self.signers.validate()?;
        self.fees.validate()?;
        self.ledger.validate()?;

        for (id, request) in &self.requests {
            if *id != request.id || *id == 0 || *id > self.latest_request_id {
                return Err(RequestError::InvalidState {
                    reason: format!("request {id} is outside 1..={}", self.latest_request_id),
                });
            }
            if request.status == RequestStatus::Requested
                && request.fee_deposit > self.ledger.reserved(&request.owner)
            {
                return Err(RequestError::InvalidState {
                    reason: format!("request {id} deposit is not reserved"),
                });
            }
        }
        Ok(())
    }
}
