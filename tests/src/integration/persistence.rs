//! # Restart Safety
//!
//! Fulfilled hashes, prices and balances must survive a restart, or a
//! relayer could replay old messages against a fresh node.

use super::fixtures::*;
use oracle_runtime::{FileSnapshotStore, OracleRuntime, SnapshotStore};
use shared_types::ManualTimeSource;
use std::sync::Arc;
use tempfile::TempDir;
use xo_05_request_registry::PriceOracleApi;
use xo_06_message_relay::{CrossChainMessage, MessageRelayApi, RelayError};

fn inbound(nonce: u64) -> CrossChainMessage {
    CrossChainMessage {
        nonce,
        payload: b"settle".to_vec(),
        endpoint: ENDPOINT,
        src_chain_id: CHAIN_A,
        dst_chain_id: CHAIN_B,
        src_tx_hash: [0x22; 32],
    }
}

#[tokio::test]
async fn test_replay_rejected_after_restart() {
    let dir = TempDir::new().unwrap();
    let signers = committee(3);
    let mut config = node_config(CHAIN_B, &signers, 2);
    config.storage.data_dir = dir.path().to_path_buf();

    let runtime = OracleRuntime::open(config.clone()).unwrap();
    let container = runtime.container();
    let message = inbound(1);
    container
        .message_relay
        .fulfill_message(CONTROLLER, message.clone(), sign_message(&signers, &message, 2))
        .await
        .unwrap();
    drop(container);
    runtime.shutdown().await.unwrap();

    let restarted = OracleRuntime::open(config).unwrap();
    let relay = restarted.container().message_relay.clone();
    assert!(relay.is_fulfilled(&message.hash()));
    assert_eq!(relay.fulfill_count(), 1);

    let replay = relay
        .fulfill_message(CONTROLLER, message.clone(), sign_message(&signers, &message, 2))
        .await;
    assert!(matches!(replay, Err(RelayError::AlreadyFulfilled { .. })));

    let next = inbound(2);
    relay
        .fulfill_message(CONTROLLER, next.clone(), sign_message(&signers, &next, 2))
        .await
        .unwrap();
    assert_eq!(relay.fulfill_count(), 2);
}

#[tokio::test]
async fn test_fulfilled_hash_survives_crash() {
    let dir = TempDir::new().unwrap();
    let signers = committee(3);
    let mut config = node_config(CHAIN_B, &signers, 2);
    config.storage.data_dir = dir.path().to_path_buf();

    let runtime = OracleRuntime::open(config.clone()).unwrap();
    let relay = runtime.container().message_relay.clone();
    let message = inbound(1);
    relay
        .fulfill_message(CONTROLLER, message.clone(), sign_message(&signers, &message, 2))
        .await
        .unwrap();
    // no shutdown, no explicit persist
    drop(relay);
    drop(runtime);

    let restarted = OracleRuntime::open(config).unwrap();
    let relay = restarted.container().message_relay.clone();
    assert!(relay.is_fulfilled(&message.hash()));
    let replay = relay
        .fulfill_message(CONTROLLER, message.clone(), sign_message(&signers, &message, 2))
        .await;
    assert!(matches!(replay, Err(RelayError::AlreadyFulfilled { .. })));
    assert_eq!(relay.fulfill_count(), 1);
}

#[tokio::test]
async fn test_requests_and_fees_survive_crash() {
    let dir = TempDir::new().unwrap();
    let signers = committee(2);
    let mut config = node_config(CHAIN_A, &signers, 2);
    config.storage.data_dir = dir.path().to_path_buf();

    let runtime = OracleRuntime::open(config.clone()).unwrap();
    let oracle = runtime.container().price_oracle.clone();
    oracle.deposit_fee(CONTRACT, 50_000).await;
    let fulfilled = oracle
        .request_prices(CONTRACT, Vec::new(), 0, 5_000)
        .await
        .unwrap();
    let created_at = oracle.get_request(fulfilled).unwrap().created_at;
    let attestations = vec![
        attest(&signers[0], created_at, &[(BTC, 41_000)]),
        attest(&signers[1], created_at, &[(BTC, 43_000)]),
    ];
    oracle
        .fulfill_request(CONTROLLER, fulfilled, attestations, 1)
        .await
        .unwrap();
    let cancelled = oracle
        .request_prices(CONTRACT, Vec::new(), 0, 5_000)
        .await
        .unwrap();
    oracle.cancel_request(CONTRACT, cancelled).await.unwrap();
    let earned = oracle.fee_balance(&CONTROLLER);
    drop(oracle);
    drop(runtime);

    let restarted = OracleRuntime::open(config).unwrap();
    let oracle = restarted.container().price_oracle.clone();
    assert_eq!(oracle.latest_request_id(), cancelled);
    assert_eq!(oracle.get_last_price(BTC).latest_price, 42_000);
    assert_eq!(oracle.fee_balance(&CONTROLLER), earned);
    assert_eq!(oracle.available_fee_balance(&CONTRACT), 50_000 - earned);
    assert_eq!(
        oracle.get_request(cancelled).unwrap().status,
        xo_05_request_registry::RequestStatus::Cancelled
    );
}

#[tokio::test]
async fn test_prices_and_balances_survive_restart() {
    let dir = TempDir::new().unwrap();
    let signers = committee(2);
    let config = node_config(CHAIN_A, &signers, 2);
    let store = Arc::new(FileSnapshotStore::new(dir.path().join("node.snapshot")));
    let clock = Arc::new(ManualTimeSource::new(START));

    let runtime = OracleRuntime::with_clock(config.clone(), clock.clone(), store.clone()).unwrap();
    let oracle = runtime.container().price_oracle.clone();
    oracle.deposit_fee(CONTRACT, 50_000).await;
    let id = oracle
        .request_prices(CONTRACT, Vec::new(), 0, 5_000)
        .await
        .unwrap();
    let attestations = vec![
        attest(&signers[0], START, &[(BTC, 41_000)]),
        attest(&signers[1], START, &[(BTC, 43_000)]),
    ];
    oracle
        .fulfill_request(CONTROLLER, id, attestations, 1)
        .await
        .unwrap();
    let pending = oracle
        .request_prices(CONTRACT, Vec::new(), 0, 5_000)
        .await
        .unwrap();
    let entry = oracle.get_last_price(BTC);
    let controller_balance = oracle.fee_balance(&CONTROLLER);
    runtime.persist().unwrap();
    assert!(store.load().unwrap().is_some());

    let restarted = OracleRuntime::with_clock(config, clock, store).unwrap();
    let oracle = restarted.container().price_oracle.clone();
    assert_eq!(oracle.get_last_price(BTC), entry);
    assert_eq!(entry.latest_price, 42_000);
    assert_eq!(oracle.fee_balance(&CONTROLLER), controller_balance);
    assert_eq!(oracle.latest_request_id(), pending);
    assert_eq!(oracle.available_fee_balance(&CONTRACT), 50_000 - controller_balance - 5_000);

    // ids keep counting from the restored state
    let third = oracle
        .request_prices(CONTRACT, Vec::new(), 0, 5_000)
        .await
        .unwrap();
    assert_eq!(third, pending + 1);
}
