//! Shared fixtures: one signer committee, node configs per chain, and
//! helpers that sign the way off-chain attesters do.

use oracle_runtime::config::{DestinationFee, FeedConfig};
use oracle_runtime::{OracleConfig, OracleContainer};
use shared_bus::{EventFilter, OracleEvent, Subscription};
use shared_crypto::{price_hash, EthSigner, RecoverableSignature};
use shared_types::{Address, Amount, AssetIndex, ChainId, ManualTimeSource, Price, Timestamp};
use std::sync::Arc;
use xo_03_price_aggregation::{encode_prices, PricePoint};
use xo_05_request_registry::{Attestation, FeeSchedule};
use xo_06_message_relay::CrossChainMessage;

pub const OWNER: Address = Address::new([0xaa; 20]);
pub const CONTRACT: Address = Address::new([0xcc; 20]);
pub const CONTROLLER: Address = Address::new([0xdd; 20]);
pub const ENDPOINT: Address = Address::new([0xee; 20]);
pub const FEE_RECEIVER: Address = Address::new([0xfe; 20]);

pub const CHAIN_A: ChainId = 31337;
pub const CHAIN_B: ChainId = 56;
pub const RELAY_FEE: Amount = 10_000_000_000_000_000;

pub const START: Timestamp = 1_670_411_136;
pub const BTC: AssetIndex = 0;
pub const ETH: AssetIndex = 1;

/// Attester keys generated the way wallets do.
pub fn committee(n: usize) -> Vec<EthSigner> {
    (0..n)
        .map(|_| {
            let key = k256::ecdsa::SigningKey::random(&mut rand::thread_rng());
            let bytes: [u8; 32] = key.to_bytes().into();
            EthSigner::from_bytes(&bytes).unwrap()
        })
        .collect()
}

pub fn fees() -> FeeSchedule {
    FeeSchedule {
        fulfill_fee_bps: 3_000,
        min_fee_balance: 1_000,
        min_gas_price: 1,
        min_gas_limit: 1_000,
        base_units: 100,
        units_per_signature: 10,
        units_per_asset: 50,
    }
}

/// Config for one chain: both services share the committee, CONTRACT may
/// request and send, CONTROLLER relays, and each chain charges a fee to
/// reach the other.
pub fn node_config(chain_id: ChainId, signers: &[EthSigner], threshold: u32) -> OracleConfig {
    let addresses: Vec<Address> = signers.iter().map(EthSigner::address).collect();
    let other = if chain_id == CHAIN_A { CHAIN_B } else { CHAIN_A };

    let mut config = OracleConfig::default();
    config.chain.chain_id = chain_id;

    let oracle = &mut config.price_oracle;
    oracle.access.owner = OWNER;
    oracle.access.contracts = vec![CONTRACT];
    oracle.access.controllers = vec![CONTROLLER];
    oracle.quorum.signers = addresses.clone();
    oracle.quorum.threshold = threshold;
    oracle.fees = fees();
    oracle.feeds = vec![
        FeedConfig {
            asset_index: BTC,
            description: "BTC/USD Price Feed".into(),
            decimals: 8,
        },
        FeedConfig {
            asset_index: ETH,
            description: "ETH/USD Price Feed".into(),
            decimals: 8,
        },
    ];

    let relay = &mut config.message_relay;
    relay.access.owner = OWNER;
    relay.access.contracts = vec![CONTRACT];
    relay.access.controllers = vec![CONTROLLER];
    relay.quorum.signers = addresses;
    relay.quorum.threshold = threshold;
    relay.fee_receiver = FEE_RECEIVER;
    relay.destination_fees = vec![DestinationFee {
        chain_id: other,
        fee: RELAY_FEE,
    }];

    config.validate().unwrap();
    config
}

pub struct Node {
    pub container: OracleContainer,
    pub clock: Arc<ManualTimeSource>,
    pub events: Subscription,
}

impl Node {
    pub fn new(config: OracleConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(START));
        let container = OracleContainer::with_clock(config, clock.clone()).unwrap();
        let events = container.event_bus.subscribe(EventFilter::all());
        Self {
            container,
            clock,
            events,
        }
    }

    pub fn events_where(&mut self, keep: impl Fn(&OracleEvent) -> bool) -> Vec<OracleEvent> {
        self.events.drain().into_iter().filter(|e| keep(e)).collect()
    }
}

/// One attester's signed price list for a request created at `timestamp`.
pub fn attest(signer: &EthSigner, timestamp: Timestamp, prices: &[(AssetIndex, Price)]) -> Attestation {
    let points: Vec<PricePoint> = prices
        .iter()
        .map(|&(asset_index, price)| PricePoint::new(asset_index, price))
        .collect();
    let encoded_prices = encode_prices(&points).unwrap();
    let signature = signer
        .sign_hash(&price_hash(timestamp, &encoded_prices))
        .unwrap();
    Attestation {
        signer: signer.address(),
        timestamp,
        encoded_prices,
        signature,
    }
}

/// Signatures over a relayed message from the first `count` attesters.
pub fn sign_message(
    signers: &[EthSigner],
    message: &CrossChainMessage,
    count: usize,
) -> Vec<RecoverableSignature> {
    let hash = message.hash();
    signers[..count]
        .iter()
        .map(|s| s.sign_hash(&hash).unwrap())
        .collect()
}
