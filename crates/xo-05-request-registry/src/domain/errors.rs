//! # Request Registry Errors
//!
//! Every error here is fatal: the call is rejected and state is unchanged.
//! Consensus failures on the price path are not errors; they surface as
//! [`FulfillOutcome::Rejected`](crate::FulfillOutcome::Rejected).

use super::request::RequestStatus;
use shared_types::{Address, Amount, ErrorKind, RequestId, Timestamp};
use thiserror::Error;
use xo_01_signer_registry::{AccessError, RegistryError};

/// Request registry failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Caller lacks the required role.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Signer set or access list update rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Deposit below the fee floor, or not covered by the owner's balance.
    #[error("insufficient request fee: required {required}, available {available}")]
    InsufficientFee {
        /// Amount needed.
        required: Amount,
        /// Amount offered or available.
        available: Amount,
    },

    /// Withdrawal larger than the unreserved balance.
    #[error("insufficient fee balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount asked for.
        requested: Amount,
        /// Unreserved balance.
        available: Amount,
    },

    /// No request with this id.
    #[error("request not found: {request_id}")]
    NotFound {
        /// Requested id.
        request_id: RequestId,
    },

    /// Fulfillment after the deadline.
    #[error("request is expired: {request_id} (expiration {expiration})")]
    Expired {
        /// Target request.
        request_id: RequestId,
        /// Its deadline.
        expiration: Timestamp,
    },

    /// Refund before the deadline, or of a request without one.
    #[error("request is not expired: {request_id}")]
    NotExpired {
        /// Target request.
        request_id: RequestId,
        /// Its deadline (`0` never expires).
        expiration: Timestamp,
    },

    /// The request already reached a terminal state.
    #[error("request already finalized: {request_id} is {status}")]
    AlreadyFinalized {
        /// Target request.
        request_id: RequestId,
        /// Its terminal state.
        status: RequestStatus,
    },

    /// Cancel from someone other than the requester.
    #[error("caller {caller} is not the owner of request {request_id}")]
    NotRequestOwner {
        /// Rejected caller.
        caller: Address,
        /// Target request.
        request_id: RequestId,
    },

    /// Requested expiration is already in the past.
    #[error("invalid expiration {expiration} (now {now})")]
    InvalidExpiration {
        /// Requested deadline.
        expiration: Timestamp,
        /// Current time.
        now: Timestamp,
    },

    /// Surcharge above 100%.
    #[error("invalid fulfill fee: {bps} bps")]
    InvalidFulfillFee {
        /// Requested basis points.
        bps: u32,
    },

    /// Feed metadata rejected.
    #[error("invalid feed: {reason}")]
    InvalidFeed {
        /// Rejection reason.
        reason: String,
    },

    /// Restored state failed validation.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// What was inconsistent.
        reason: String,
    },
}

impl RequestError {
    /// Taxonomy bucket.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Access(e) => e.kind(),
            RequestError::Registry(e) => e.kind(),
            RequestError::InsufficientFee { .. } | RequestError::InsufficientBalance { .. } => {
                ErrorKind::Fee
            }
            RequestError::NotFound { .. }
            | RequestError::Expired { .. }
            | RequestError::NotExpired { .. }
            | RequestError::AlreadyFinalized { .. }
            | RequestError::InvalidState { .. } => ErrorKind::State,
            RequestError::NotRequestOwner { .. } => ErrorKind::Authorization,
            RequestError::InvalidExpiration { .. }
            | RequestError::InvalidFulfillFee { .. }
            | RequestError::InvalidFeed { .. } => ErrorKind::Validation,
        }
    }
}
