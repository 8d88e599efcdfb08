//! # xOracle Benchmarks
//!
//! | Path | What dominates |
//! |------|----------------|
//! | Quorum verification | secp256k1 recovery per signature |
//! | Median | sort of the per-asset submissions |
//! | Aggregation | decode plus one median per asset |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_crypto::{keccak256, EthSigner};
use std::sync::Arc;
use std::time::Duration;
use xo_01_signer_registry::{SignerRegistry, SignerSet};
use xo_02_signature_verification::QuorumVerifier;
use xo_03_price_aggregation::{aggregate, decode_prices, encode_prices, median, PricePoint};

fn bench_quorum_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("xo-02-quorum-verification");
    group.measurement_time(Duration::from_secs(10));

    let hash = keccak256(b"cross-chain message");
    for size in [3usize, 7, 21] {
        let signers: Vec<EthSigner> = (0..size).map(|_| EthSigner::random()).collect();
        let threshold = u32::try_from(size * 2 / 3 + 1).unwrap();
        let set = SignerSet::with_signers(signers.iter().map(EthSigner::address), threshold)
            .unwrap();
        let verifier = QuorumVerifier::new(Arc::new(SignerRegistry::new(set)));
        let signatures: Vec<_> = signers.iter().map(|s| s.sign_hash(&hash).unwrap()).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("verify_hash", size), &signatures, |b, sigs| {
            b.iter(|| black_box(verifier.verify_hash(&hash, sigs).is_ok()))
        });
    }
    group.finish();
}

fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("xo-03-median");
    let mut rng = rand::thread_rng();

    for size in [5usize, 21, 101] {
        let values: Vec<u64> = (0..size).map(|_| rng.gen_range(1..100_000_000)).collect();
        group.bench_with_input(BenchmarkId::new("median", size), &values, |b, values| {
            b.iter(|| black_box(median(values)))
        });
    }
    group.finish();
}

fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("xo-03-aggregation");
    let mut rng = rand::thread_rng();

    // 21 signers, 50 assets each
    let encoded: Vec<Vec<u8>> = (0..21)
        .map(|_| {
            let points: Vec<PricePoint> = (0..50)
                .map(|asset| PricePoint::new(asset, rng.gen_range(1..100_000_000)))
                .collect();
            encode_prices(&points).unwrap()
        })
        .collect();

    group.bench_function("decode_and_aggregate_21x50", |b| {
        b.iter(|| {
            let vectors: Vec<Vec<PricePoint>> = encoded
                .iter()
                .map(|bytes| decode_prices(bytes).unwrap())
                .collect();
            black_box(aggregate(vectors.iter().map(Vec::as_slice), 15))
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_quorum_verification,
    bench_median,
    bench_aggregation
);
criterion_main!(benches);
