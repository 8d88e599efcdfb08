//! # Cross-Chain Relay Flow
//!
//! A contract on chain A sends, the committee signs the message hash, a
//! controller fulfills on chain B and the endpoint's mailbox receives the
//! payload. Both chains run the same committee.

use super::fixtures::*;
use oracle_runtime::handlers::MetricsHandler;
use oracle_telemetry::OracleMetrics;
use shared_bus::OracleEvent;
use std::time::Duration;
use xo_02_signature_verification::ConsensusError;
use xo_06_message_relay::{MessageRelayApi, RelayError};

struct Bridge {
    signers: Vec<shared_crypto::EthSigner>,
    a: Node,
    b: Node,
}

fn bridge(threshold: u32) -> Bridge {
    let signers = committee(3);
    Bridge {
        a: Node::new(node_config(CHAIN_A, &signers, threshold)),
        b: Node::new(node_config(CHAIN_B, &signers, threshold)),
        signers,
    }
}

#[tokio::test]
async fn test_send_then_fulfill_on_destination() {
    let mut bridge = bridge(2);
    let mut endpoint = bridge.b.container.endpoints.register(ENDPOINT);

    let outbound = bridge
        .a
        .container
        .message_relay
        .send_message(CONTRACT, b"mint 10".to_vec(), ENDPOINT, CHAIN_B, RELAY_FEE + 1)
        .await
        .unwrap();
    assert_eq!(outbound.message.nonce, 1);
    assert_eq!(outbound.message.src_chain_id, CHAIN_A);
    assert_eq!(outbound.message.dst_chain_id, CHAIN_B);
    assert_eq!(outbound.message.src_tx_hash, outbound.send_hash);
    assert_eq!(
        bridge.a.container.fee_receiver.received(&FEE_RECEIVER),
        RELAY_FEE + 1
    );

    let sent = bridge.a.events_where(|e: &OracleEvent| matches!(e, OracleEvent::MessageSent { .. }));
    assert!(matches!(
        &sent[..],
        [OracleEvent::MessageSent { nonce: 1, dst_chain_id: CHAIN_B, .. }]
    ));

    // relayer picks the message up and collects signatures
    let message = outbound.message;
    let signatures = sign_message(&bridge.signers, &message, 2);
    let hash = bridge
        .b
        .container
        .message_relay
        .fulfill_message(CONTROLLER, message.clone(), signatures)
        .await
        .unwrap();
    assert_eq!(hash, message.hash());

    let relay_b = &bridge.b.container.message_relay;
    assert!(relay_b.is_fulfilled(&hash));
    assert_eq!(relay_b.fulfill_count(), 1);

    let delivered = endpoint.try_recv().unwrap();
    assert_eq!(delivered.message_hash, hash);
    assert_eq!(delivered.src_chain_id, CHAIN_A);
    assert_eq!(delivered.src_tx_hash, outbound.send_hash);
    assert_eq!(delivered.payload, b"mint 10".to_vec());

    let fulfilled =
        bridge.b.events_where(|e: &OracleEvent| matches!(e, OracleEvent::MessageFulfilled { .. }));
    assert_eq!(
        fulfilled,
        vec![OracleEvent::MessageFulfilled {
            message_hash: hash,
            nonce: 1,
            endpoint: ENDPOINT,
            src_chain_id: CHAIN_A,
            fulfill_count: 1,
        }]
    );
}

#[tokio::test]
async fn test_replay_and_wrong_chain_rejected() {
    let bridge = bridge(2);
    let outbound = bridge
        .a
        .container
        .message_relay
        .send_message(CONTRACT, b"x".to_vec(), ENDPOINT, CHAIN_B, RELAY_FEE)
        .await
        .unwrap();
    let message = outbound.message;
    let signatures = sign_message(&bridge.signers, &message, 3);

    // back onto the chain it came from
    let err = bridge
        .a
        .container
        .message_relay
        .fulfill_message(CONTROLLER, message.clone(), signatures.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::ChainMismatch { .. }));
    assert_eq!(err.to_string(), "invalid chainId");

    let relay_b = &bridge.b.container.message_relay;
    relay_b
        .fulfill_message(CONTROLLER, message.clone(), signatures.clone())
        .await
        .unwrap();
    let replay = relay_b
        .fulfill_message(CONTROLLER, message, signatures)
        .await
        .unwrap_err();
    assert!(matches!(replay, RelayError::AlreadyFulfilled { .. }));
    assert_eq!(replay.to_string(), "messageHash already fulfilled");
    assert_eq!(relay_b.fulfill_count(), 1);
}

#[tokio::test]
async fn test_short_quorum_is_fatal_and_stateless() {
    let bridge = bridge(3);
    let outbound = bridge
        .a
        .container
        .message_relay
        .send_message(CONTRACT, b"x".to_vec(), ENDPOINT, CHAIN_B, RELAY_FEE)
        .await
        .unwrap();
    let message = outbound.message;

    let relay_b = &bridge.b.container.message_relay;
    let err = relay_b
        .fulfill_message(
            CONTROLLER,
            message.clone(),
            sign_message(&bridge.signers, &message, 2),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RelayError::Consensus(ConsensusError::BelowThreshold { got: 2, required: 3 })
    );
    assert!(!relay_b.is_fulfilled(&message.hash()));

    relay_b
        .fulfill_message(
            CONTROLLER,
            message.clone(),
            sign_message(&bridge.signers, &message, 3),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_endpoint_still_commits_hash() {
    let mut bridge = bridge(2);
    let outbound = bridge
        .a
        .container
        .message_relay
        .send_message(CONTRACT, b"x".to_vec(), ENDPOINT, CHAIN_B, RELAY_FEE)
        .await
        .unwrap();
    let message = outbound.message;

    let hash = bridge
        .b
        .container
        .message_relay
        .fulfill_message(
            CONTROLLER,
            message.clone(),
            sign_message(&bridge.signers, &message, 2),
        )
        .await
        .unwrap();
    assert!(bridge.b.container.message_relay.is_fulfilled(&hash));

    let failed = bridge
        .b
        .events_where(|e: &OracleEvent| matches!(e, OracleEvent::MessageDeliveryFailed { .. }));
    assert_eq!(failed.len(), 1);
}

#[tokio::test]
async fn test_paused_source_blocks_send_only() {
    let bridge = bridge(2);
    let relay_a = &bridge.a.container.message_relay;
    relay_a.set_pause(OWNER, true).await.unwrap();

    let err = relay_a
        .send_message(CONTRACT, b"x".to_vec(), ENDPOINT, CHAIN_B, RELAY_FEE)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Pausable: paused");

    // inbound traffic to the paused chain still lands
    let message = xo_06_message_relay::CrossChainMessage {
        nonce: 7,
        payload: b"inbound".to_vec(),
        endpoint: ENDPOINT,
        src_chain_id: CHAIN_B,
        dst_chain_id: CHAIN_A,
        src_tx_hash: [0x11; 32],
    };
    relay_a
        .fulfill_message(
            CONTROLLER,
            message.clone(),
            sign_message(&bridge.signers, &message, 2),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_metrics_handler_counts_relay_traffic() {
    let bridge = bridge(2);
    let metrics: &'static OracleMetrics = Box::leak(Box::new(OracleMetrics::new().unwrap()));
    tokio::spawn(MetricsHandler::new(&bridge.b.container.event_bus, metrics).run());

    let outbound = bridge
        .a
        .container
        .message_relay
        .send_message(CONTRACT, b"x".to_vec(), ENDPOINT, CHAIN_B, RELAY_FEE)
        .await
        .unwrap();
    let message = outbound.message;
    bridge
        .b
        .container
        .message_relay
        .fulfill_message(
            CONTROLLER,
            message.clone(),
            sign_message(&bridge.signers, &message, 2),
        )
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(2), async {
        while metrics.delivery_failures.get() < 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(metrics.messages_fulfilled.get(), 1);
    // the send happened on chain A's bus
    assert_eq!(metrics.messages_sent.get(), 0);
}

#[tokio::test]
async fn test_zero_threshold_accepts_unsigned_message_once() {
    let bridge = bridge(0);
    let relay_b = &bridge.b.container.message_relay;
    let message = xo_06_message_relay::CrossChainMessage {
        nonce: 1,
        payload: b"unsigned".to_vec(),
        endpoint: ENDPOINT,
        src_chain_id: CHAIN_A,
        dst_chain_id: CHAIN_B,
        src_tx_hash: [0x33; 32],
    };

    let hash = relay_b
        .fulfill_message(CONTROLLER, message.clone(), Vec::new())
        .await
        .unwrap();
    assert!(relay_b.is_fulfilled(&hash));

    let replay = relay_b
        .fulfill_message(CONTROLLER, message, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(replay, RelayError::AlreadyFulfilled { .. }));
    assert_eq!(relay_b.fulfill_count(), 1);
}
