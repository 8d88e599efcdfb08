//! # Inbound Ports
//!
//! Entry points of the price oracle.

use crate::domain::{Attestation, FulfillOutcome, Request, RequestError};
use async_trait::async_trait;
use shared_types::{Address, Amount, AssetIndex, RequestId, Timestamp};
use xo_04_price_feed::PriceFeedEntry;

/// Price oracle API - inbound port.
#[async_trait]
pub trait PriceOracleApi: Send + Sync {
    /// Credit `amount` to `owner`'s fee balance.
    async fn deposit_fee(&self, owner: Address, amount: Amount);

    /// Take `amount` out of the caller's unreserved balance.
    async fn withdraw_fee(&self, caller: Address, amount: Amount) -> Result<(), RequestError>;

    /// Open a price request, reserving `fee_deposit` from the caller's
    /// balance. Returns the new id.
    async fn request_prices(
        &self,
        caller: Address,
        payload: Vec<u8>,
        expiration: Timestamp,
        fee_deposit: Amount,
    ) -> Result<RequestId, RequestError>;

    /// Submit attestations for a pending request.
    ///
    /// `gas_price` is the controller's reported execution price, floored at
    /// the configured minimum. A consensus failure is `Ok(Rejected)`.
    async fn fulfill_request(
        &self,
        caller: Address,
        request_id: RequestId,
        attestations: Vec<Attestation>,
        gas_price: Amount,
    ) -> Result<FulfillOutcome, RequestError>;

    /// Withdraw a pending request (requester only).
    async fn cancel_request(&self, caller: Address, request_id: RequestId)
        -> Result<(), RequestError>;

    /// Close an expired request (controller only).
    async fn refund_request(&self, caller: Address, request_id: RequestId)
        -> Result<(), RequestError>;

    /// Close an expired request (owner only).
    async fn admin_refund_request(
        &self,
        caller: Address,
        request_id: RequestId,
    ) -> Result<(), RequestError>;

    /// Latest feed entry for an asset; zero-valued if never written.
    fn get_last_price(&self, asset_index: AssetIndex) -> PriceFeedEntry;

    /// Request by id.
    fn get_request(&self, request_id: RequestId) -> Option<Request>;

    /// Highest id allocated so far.
    fn latest_request_id(&self) -> RequestId;
}
