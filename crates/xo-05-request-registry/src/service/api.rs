//! `PriceOracleApi` implementation.

use super::{RegistryInner, RequestRegistry};
use crate::domain::{Attestation, FulfillOutcome, Request, RequestError, RequestStatus};
use crate::ports::inbound::PriceOracleApi;
use crate::ports::outbound::PriceCallback;
use async_trait::async_trait;
use shared_bus::OracleEvent;
use shared_types::{Address, Amount, AssetIndex, RequestId, Timestamp};
use tracing::{debug, info, warn};
use xo_01_signer_registry::{AccessError, AccessPolicy};
use xo_02_signature_verification::SignedDigest;
use xo_03_price_aggregation::{aggregate, decode_prices, PricePoint};
use xo_04_price_feed::PriceFeedEntry;

/// Verifier inputs plus the decoded vector behind each one.
fn collect_attestations(
    request: &Request,
    attestations: &[Attestation],
) -> (Vec<SignedDigest>, Vec<Vec<PricePoint>>) {
    let mut items = Vec::with_capacity(attestations.len());
    let mut vectors = Vec::with_capacity(attestations.len());

    for attestation in attestations {
        if attestation.timestamp != request.created_at {
            debug!(
                request_id = request.id,
                signer = %attestation.signer,
                timestamp = attestation.timestamp,
                "Attestation timestamp does not match request"
            );
            continue;
        }
        let points = match decode_prices(&attestation.encoded_prices) {
            Ok(points) => points,
            Err(e) => {
                debug!(request_id = request.id, signer = %attestation.signer, error = %e, "Malformed prices");
                continue;
            }
        };
        items.push(SignedDigest {
            digest: attestation.digest(),
            signature: attestation.signature,
            claimed_signer: Some(attestation.signer),
        });
        vectors.push(points);
    }

    (items, vectors)
}

fn open_request(
    inner: &RegistryInner,
    request_id: RequestId,
) -> Result<Request, RequestError> {
    let request = inner
        .requests
        .get(&request_id)
        .ok_or(RequestError::NotFound { request_id })?;
    if request.status.is_terminal() {
        return Err(RequestError::AlreadyFinalized {
            request_id,
            status: request.status,
        });
    }
    Ok(request.clone())
}

impl RequestRegistry {
    /// Move an open request to `Cancelled` or `Refunded` and drop its
    /// reservation. `role` runs before the lookup and `check` after it,
    /// both before any change.
    fn close_request<R, F>(
        &self,
        request_id: RequestId,
        status: RequestStatus,
        role: R,
        check: F,
    ) -> Result<Request, RequestError>
    where
        R: FnOnce(&AccessPolicy) -> Result<(), AccessError>,
        F: FnOnce(&Request) -> Result<(), RequestError>,
    {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        role(&inner.access)?;
        let request = open_request(inner, request_id)?;
        check(&request)?;

        inner.ledger.release(&request.owner, request.fee_deposit);
        if let Some(stored) = inner.requests.get_mut(&request_id) {
            stored.status = status;
        }
        info!(request_id, %status, "Request closed");
        Ok(request)
    }

    fn ensure_refundable(&self, request: &Request) -> Result<(), RequestError> {
        if request.is_expired(self.clock.now()) {
            Ok(())
        } else {
            Err(RequestError::NotExpired {
                request_id: request.id,
                expiration: request.expiration,
            })
        }
    }
}

#[async_trait]
impl PriceOracleApi for RequestRegistry {
    async fn deposit_fee(&self, owner: Address, amount: Amount) {
        self.inner.write().ledger.deposit(owner, amount);
        debug!(%owner, amount, "Fee deposited");
        self.events
            .publish(OracleEvent::FeeDeposited { owner, amount })
            .await;
    }

    async fn withdraw_fee(&self, caller: Address, amount: Amount) -> Result<(), RequestError> {
        self.inner.write().ledger.withdraw(&caller, amount)?;
        debug!(%caller, amount, "Fee withdrawn");
        self.events
            .publish(OracleEvent::FeeWithdrawn {
                owner: caller,
                amount,
            })
            .await;
        Ok(())
    }

    async fn request_prices(
        &self,
        caller: Address,
        payload: Vec<u8>,
        expiration: Timestamp,
        fee_deposit: Amount,
    ) -> Result<RequestId, RequestError> {
        let now = self.clock.now();

        let request = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;

            inner.access.ensure_contract_caller(&caller)?;
            if expiration != 0 && expiration <= now {
                return Err(RequestError::InvalidExpiration { expiration, now });
            }

            let required = inner.fees.minimum_fee();
            if fee_deposit < required {
                return Err(RequestError::InsufficientFee {
                    required,
                    available: fee_deposit,
                });
            }
            inner.ledger.reserve(&caller, fee_deposit)?;

            let id = inner.latest_request_id + 1;
            let request = Request {
                id,
                created_at: now,
                owner: caller,
                payload,
                status: RequestStatus::Requested,
                expiration,
                fee_deposit,
                fee_quote: required,
            };
            inner.latest_request_id = id;
            inner.requests.insert(id, request.clone());
            request
        };

        info!(request_id = request.id, owner = %caller, expiration, fee_deposit, "Price request created");
        self.events
            .publish(OracleEvent::RequestCreated {
                request_id: request.id,
                owner: request.owner,
                payload: request.payload,
                created_at: request.created_at,
                expiration: request.expiration,
                fee_deposit: request.fee_deposit,
            })
            .await;

        Ok(request.id)
    }

    async fn fulfill_request(
        &self,
        caller: Address,
        request_id: RequestId,
        attestations: Vec<Attestation>,
        gas_price: Amount,
    ) -> Result<FulfillOutcome, RequestError> {
        let now = self.clock.now();
        let mut events = Vec::new();

        let (outcome, callback) = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;

            inner.access.ensure_controller(&caller)?;
            let request = open_request(inner, request_id)?;
            if request.is_expired(now) {
                return Err(RequestError::Expired {
                    request_id,
                    expiration: request.expiration,
                });
            }

            let (items, vectors) = collect_attestations(&request, &attestations);
            match self.verifier.verify(&items) {
                Err(e) => {
                    warn!(request_id, error = %e, "Fulfillment rejected, request stays open");
                    let reason = e.to_string();
                    events.push(OracleEvent::FulfillRequest {
                        request_id,
                        success: false,
                        reason: reason.clone(),
                    });
                    (FulfillOutcome::Rejected { reason }, None)
                }
                Ok(quorum) => {
                    let accepted = quorum.accepted.iter().map(|&i| vectors[i].as_slice());
                    let prices = aggregate(accepted, quorum.threshold);

                    let mut stale_assets = Vec::new();
                    for (&asset_index, &price) in &prices {
                        match self
                            .feed
                            .update(asset_index, price, request_id, request.created_at, now)
                        {
                            Ok(entry) => events.push(OracleEvent::PriceUpdated {
                                asset_index,
                                round: entry.round,
                                price,
                                source_request_id: request_id,
                                updated_at: now,
                            }),
                            Err(e) => {
                                warn!(request_id, asset_index, error = %e, "Skipping stale asset");
                                stale_assets.push(asset_index);
                                events.push(OracleEvent::StaleUpdateSkipped {
                                    asset_index,
                                    current_request_id: self.feed.read(asset_index).source_request_id,
                                    attempted_request_id: request_id,
                                });
                            }
                        }
                    }

                    let units = inner.fees.estimate_units(attestations.len(), prices.len());
                    let fee_charged = inner.fees.charge(request.fee_deposit, units, gas_price);
                    inner
                        .ledger
                        .settle(&request.owner, caller, request.fee_deposit, fee_charged);
                    if let Some(stored) = inner.requests.get_mut(&request_id) {
                        stored.status = RequestStatus::Fulfilled;
                    }

                    info!(
                        request_id,
                        signers = quorum.count,
                        assets = prices.len(),
                        stale = stale_assets.len(),
                        fee_charged,
                        "Request fulfilled"
                    );
                    events.push(OracleEvent::FeeSettled {
                        request_id,
                        payer: request.owner,
                        payee: caller,
                        amount: fee_charged,
                    });
                    events.push(OracleEvent::FulfillRequest {
                        request_id,
                        success: true,
                        reason: String::new(),
                    });

                    let callback = PriceCallback {
                        request_id,
                        payload: request.payload,
                        prices: prices.clone(),
                    };
                    (
                        FulfillOutcome::Fulfilled {
                            prices,
                            stale_assets,
                            fee_charged,
                        },
                        Some((request.owner, callback)),
                    )
                }
            }
        };

        self.events.publish_all(events).await;

        if let Some((owner, callback)) = callback {
            if let Err(e) = self.callbacks.deliver(&owner, callback) {
                warn!(request_id, %owner, error = %e, "Price callback not delivered");
            }
        }

        Ok(outcome)
    }

    async fn cancel_request(
        &self,
        caller: Address,
        request_id: RequestId,
    ) -> Result<(), RequestError> {
        let request = self.close_request(
            request_id,
            RequestStatus::Cancelled,
            AccessPolicy::ensure_not_paused,
            |request| {
                if request.owner != caller {
                    return Err(RequestError::NotRequestOwner { caller, request_id });
                }
                Ok(())
            },
        )?;

        self.events
            .publish(OracleEvent::RequestCancelled {
                request_id,
                owner: request.owner,
            })
            .await;
        Ok(())
    }

    async fn refund_request(
        &self,
        caller: Address,
        request_id: RequestId,
    ) -> Result<(), RequestError> {
        self.close_request(
            request_id,
            RequestStatus::Refunded,
            |access| access.ensure_controller(&caller),
            |request| self.ensure_refundable(request),
        )?;

        self.events
            .publish(OracleEvent::RequestRefunded {
                request_id,
                refunded_by: caller,
                admin: false,
            })
            .await;
        Ok(())
    }

    async fn admin_refund_request(
        &self,
        caller: Address,
        request_id: RequestId,
    ) -> Result<(), RequestError> {
        self.close_request(
            request_id,
            RequestStatus::Refunded,
            |access| access.ensure_owner(&caller),
            |request| self.ensure_refundable(request),
        )?;

        self.events
            .publish(OracleEvent::RequestRefunded {
                request_id,
                refunded_by: caller,
                admin: true,
            })
            .await;
        Ok(())
    }

    fn get_last_price(&self, asset_index: AssetIndex) -> PriceFeedEntry {
        self.feed.read(asset_index)
    }

    fn get_request(&self, request_id: RequestId) -> Option<Request> {
        self.inner.read().requests.get(&request_id).cloned()
    }

    fn latest_request_id(&self) -> RequestId {
        self.inner.read().latest_request_id
    }
}
