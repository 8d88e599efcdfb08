//! # Price Request Flow
//!
//! Contract deposits and requests, the committee attests off-chain, a
//! controller submits, and the feed, the fee ledger and the consumer's
//! mailbox all reflect the outcome.

use super::fixtures::*;
use shared_bus::OracleEvent;
use shared_types::RequestId;
use xo_05_request_registry::{FulfillOutcome, PriceOracleApi, RequestError, RequestStatus};

const FUNDING: u128 = 100_000;
const DEPOSIT: u128 = 5_000;

async fn open_request(node: &Node) -> RequestId {
    node.container
        .price_oracle
        .request_prices(CONTRACT, b"btc,eth".to_vec(), 0, DEPOSIT)
        .await
        .unwrap()
}

fn created_at(node: &Node, request_id: RequestId) -> u64 {
    node.container
        .price_oracle
        .get_request(request_id)
        .unwrap()
        .created_at
}

#[tokio::test]
async fn test_request_to_callback() {
    let signers = committee(3);
    let mut node = Node::new(node_config(CHAIN_A, &signers, 2));
    let oracle = node.container.price_oracle.clone();
    let mut consumer = node.container.callbacks.register(CONTRACT);

    oracle.deposit_fee(CONTRACT, FUNDING).await;
    let id = open_request(&node).await;
    assert_eq!(oracle.available_fee_balance(&CONTRACT), FUNDING - DEPOSIT);

    node.clock.advance(12);
    let ts = created_at(&node, id);
    let attestations = vec![
        attest(&signers[0], ts, &[(BTC, 5), (ETH, 100)]),
        attest(&signers[1], ts, &[(BTC, 4), (ETH, 200)]),
        attest(&signers[2], ts, &[(BTC, 3)]),
    ];

    let outcome = oracle
        .fulfill_request(CONTROLLER, id, attestations, 1)
        .await
        .unwrap();
    let FulfillOutcome::Fulfilled {
        prices,
        stale_assets,
        fee_charged,
    } = outcome
    else {
        panic!("expected fulfillment");
    };
    assert_eq!(prices.get(&BTC), Some(&4));
    assert_eq!(prices.get(&ETH), Some(&150));
    assert!(stale_assets.is_empty());

    let btc = oracle.get_last_price(BTC);
    assert_eq!(btc.latest_price, 4);
    assert_eq!(btc.source_request_id, id);
    assert_eq!(btc.request_timestamp, START);
    assert_eq!(btc.updated_at, START + 12);
    assert_eq!(oracle.get_decimals(BTC), 8);

    // fee conservation
    assert_eq!(oracle.fee_balance(&CONTRACT), FUNDING - fee_charged);
    assert_eq!(oracle.fee_balance(&CONTROLLER), fee_charged);
    assert_eq!(oracle.available_fee_balance(&CONTRACT), FUNDING - fee_charged);

    let callback = consumer.try_recv().unwrap();
    assert_eq!(callback.request_id, id);
    assert_eq!(callback.payload, b"btc,eth".to_vec());
    assert_eq!(callback.prices, prices);

    let events = node.events_where(|e: &OracleEvent| {
        matches!(
            e,
            OracleEvent::RequestCreated { .. }
                | OracleEvent::PriceUpdated { .. }
                | OracleEvent::FulfillRequest { .. }
        )
    });
    assert!(matches!(events[0], OracleEvent::RequestCreated { request_id: 1, .. }));
    assert_eq!(
        events
            .iter()
            .filter(|e: &&OracleEvent| matches!(e, OracleEvent::PriceUpdated { .. }))
            .count(),
        2
    );
    assert!(matches!(
        events.last(),
        Some(OracleEvent::FulfillRequest { request_id: 1, success: true, .. })
    ));
}

#[tokio::test]
async fn test_out_of_order_fulfillment_keeps_newer_price() {
    let signers = committee(3);
    let mut node = Node::new(node_config(CHAIN_A, &signers, 2));
    let oracle = node.container.price_oracle.clone();
    oracle.deposit_fee(CONTRACT, FUNDING).await;

    let older = open_request(&node).await;
    node.clock.advance(5);
    let newer = open_request(&node).await;

    let ts_newer = created_at(&node, newer);
    let newer_attestations = vec![
        attest(&signers[0], ts_newer, &[(BTC, 50_000)]),
        attest(&signers[1], ts_newer, &[(BTC, 50_000)]),
    ];
    oracle
        .fulfill_request(CONTROLLER, newer, newer_attestations, 1)
        .await
        .unwrap();

    let ts_older = created_at(&node, older);
    let older_attestations = vec![
        attest(&signers[0], ts_older, &[(BTC, 49_000), (ETH, 3_000)]),
        attest(&signers[1], ts_older, &[(BTC, 49_000), (ETH, 3_000)]),
    ];
    let outcome = oracle
        .fulfill_request(CONTROLLER, older, older_attestations, 1)
        .await
        .unwrap();

    match outcome {
        FulfillOutcome::Fulfilled {
            prices,
            stale_assets,
            ..
        } => {
            assert_eq!(stale_assets, vec![BTC]);
            assert_eq!(prices.get(&ETH), Some(&3_000));
            assert!(!prices.contains_key(&BTC));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(oracle.get_last_price(BTC).latest_price, 50_000);
    assert_eq!(oracle.get_last_price(BTC).source_request_id, newer);
    assert_eq!(oracle.get_last_price(ETH).source_request_id, older);
    assert_eq!(
        oracle.get_request(older).unwrap().status,
        RequestStatus::Fulfilled
    );

    let skipped = node.events_where(|e: &OracleEvent| {
        matches!(e, OracleEvent::StaleUpdateSkipped { .. })
    });
    assert_eq!(
        skipped,
        vec![OracleEvent::StaleUpdateSkipped {
            asset_index: BTC,
            current_request_id: newer,
            attempted_request_id: older,
        }]
    );
}

#[tokio::test]
async fn test_quorum_soft_fail_then_finalize() {
    let signers = committee(3);
    let mut node = Node::new(node_config(CHAIN_A, &signers, 2));
    let oracle = node.container.price_oracle.clone();
    oracle.deposit_fee(CONTRACT, FUNDING).await;
    let id = open_request(&node).await;
    let ts = created_at(&node, id);

    // t - 1 signatures
    let outcome = oracle
        .fulfill_request(CONTROLLER, id, vec![attest(&signers[0], ts, &[(BTC, 7)])], 1)
        .await
        .unwrap();
    assert!(matches!(outcome, FulfillOutcome::Rejected { .. }));
    assert_eq!(oracle.get_request(id).unwrap().status, RequestStatus::Requested);
    assert_eq!(oracle.get_last_price(BTC).round, 0);
    assert_eq!(oracle.fee_balance(&CONTROLLER), 0);

    let rejected = node.events_where(|e: &OracleEvent| {
        matches!(e, OracleEvent::FulfillRequest { success: false, .. })
    });
    assert_eq!(rejected.len(), 1);

    // t signatures
    let quorum = vec![
        attest(&signers[0], ts, &[(BTC, 7)]),
        attest(&signers[2], ts, &[(BTC, 9)]),
    ];
    assert!(oracle
        .fulfill_request(CONTROLLER, id, quorum.clone(), 1)
        .await
        .unwrap()
        .is_fulfilled());
    let before = oracle.get_last_price(BTC);

    assert!(matches!(
        oracle.fulfill_request(CONTROLLER, id, quorum, 1).await,
        Err(RequestError::AlreadyFinalized { .. })
    ));
    assert_eq!(oracle.get_last_price(BTC), before);
}

#[tokio::test]
async fn test_terminal_states_are_final() {
    let signers = committee(2);
    let node = Node::new(node_config(CHAIN_A, &signers, 2));
    let oracle = node.container.price_oracle.clone();
    oracle.deposit_fee(CONTRACT, FUNDING).await;

    // cancelled: no fulfill, no refund
    let cancelled = open_request(&node).await;
    oracle.cancel_request(CONTRACT, cancelled).await.unwrap();
    let ts = created_at(&node, cancelled);
    let attestations = vec![
        attest(&signers[0], ts, &[(BTC, 1)]),
        attest(&signers[1], ts, &[(BTC, 1)]),
    ];
    assert!(matches!(
        oracle
            .fulfill_request(CONTROLLER, cancelled, attestations.clone(), 1)
            .await,
        Err(RequestError::AlreadyFinalized { .. })
    ));
    assert!(matches!(
        oracle.admin_refund_request(OWNER, cancelled).await,
        Err(RequestError::AlreadyFinalized { .. })
    ));
    assert_eq!(oracle.available_fee_balance(&CONTRACT), FUNDING);

    // fulfilled: no cancel, no refund
    let fulfilled = oracle
        .request_prices(CONTRACT, Vec::new(), START + 60, DEPOSIT)
        .await
        .unwrap();
    let ts = created_at(&node, fulfilled);
    let attestations = vec![
        attest(&signers[0], ts, &[(BTC, 1)]),
        attest(&signers[1], ts, &[(BTC, 1)]),
    ];
    oracle
        .fulfill_request(CONTROLLER, fulfilled, attestations, 1)
        .await
        .unwrap();
    node.clock.advance(120);
    assert!(matches!(
        oracle.cancel_request(CONTRACT, fulfilled).await,
        Err(RequestError::AlreadyFinalized { .. })
    ));
    assert!(matches!(
        oracle.refund_request(CONTROLLER, fulfilled).await,
        Err(RequestError::AlreadyFinalized { .. })
    ));
}

#[tokio::test]
async fn test_expired_request_refunds_reservation() {
    let signers = committee(2);
    let node = Node::new(node_config(CHAIN_A, &signers, 1));
    let oracle = node.container.price_oracle.clone();
    oracle.deposit_fee(CONTRACT, FUNDING).await;

    let id = oracle
        .request_prices(CONTRACT, Vec::new(), START + 30, DEPOSIT)
        .await
        .unwrap();
    assert!(matches!(
        oracle.refund_request(CONTROLLER, id).await,
        Err(RequestError::NotExpired { .. })
    ));

    node.clock.advance(31);
    let attestations = vec![attest(&signers[0], START, &[(BTC, 1)])];
    assert!(matches!(
        oracle.fulfill_request(CONTROLLER, id, attestations, 1).await,
        Err(RequestError::Expired { .. })
    ));

    oracle.refund_request(CONTROLLER, id).await.unwrap();
    assert_eq!(oracle.get_request(id).unwrap().status, RequestStatus::Refunded);
    assert_eq!(oracle.available_fee_balance(&CONTRACT), FUNDING);
    assert_eq!(oracle.fee_balance(&CONTROLLER), 0);
}
