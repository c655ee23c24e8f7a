//! # QC-18 Slashing Brutal Benchmarks
//!
//! Performance claims to validate:
//! - Window update: O(1) per observation, independent of window size
//! - Block processing: O(n) for n votes
//! - Downtime storm: every validator punished in the same block
//!
//! Brutal Conditions:
//! - Windows up to 100,000 blocks
//! - 10,000 validators per block
//! - Random signing patterns

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use qc_18_slashing::adapters::{InMemoryKVStore, InMemoryValidatorSet, StaticParamsProvider};
use qc_18_slashing::{
    AddressIndex, BlockSigningReport, PublicKey, SlashingApi, SlashingParams,
    SlashingParamsBuilder, SlashingService, Timestamp, ValidatorAddress, ValidatorVote,
};

type BenchService = SlashingService<InMemoryKVStore, InMemoryValidatorSet, StaticParamsProvider>;

fn bench_key(i: u32) -> PublicKey {
    let mut bytes = [0u8; 32];
    bytes[..4].copy_from_slice(&i.to_be_bytes());
    PublicKey::new(bytes)
}

fn bench_params(window: u64) -> SlashingParams {
    SlashingParamsBuilder::new()
        .signed_blocks_window(window)
        .min_signed_per_window(window / 2)
        .build()
        .expect("valid params")
}

/// Service with `validators` bonded at height 0.
fn setup(window: u64, validators: u32) -> (BenchService, AddressIndex, Vec<ValidatorAddress>) {
    let gateway = Arc::new(InMemoryValidatorSet::new());
    let provider = Arc::new(StaticParamsProvider::new(bench_params(window)).expect("valid params"));
    let mut service = SlashingService::new(InMemoryKVStore::new(), Arc::clone(&gateway), provider);
    let mut index = AddressIndex::new();

    let addresses = (0..validators)
        .map(|i| {
            let key = bench_key(i);
            let address = gateway.add_validator(key, 100, 1_000_000);
            service
                .on_validator_bonded(&mut index, key, 0)
                .expect("bonding succeeds");
            address
        })
        .collect();
    (service, index, addresses)
}

fn block_report(height: u64, votes: Vec<ValidatorVote>) -> BlockSigningReport {
    BlockSigningReport::new(height, Timestamp::from_secs(height * 5)).with_votes(votes)
}

pub fn brutal_window_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18/brutal/window_update");
    group.measurement_time(Duration::from_secs(10));

    // Claim: cost does not grow with the window
    let window_sizes = [100u64, 10_000, 100_000];

    for window in window_sizes {
        group.bench_with_input(
            BenchmarkId::new("single_validator", window),
            &window,
            |b, &window| {
                let (mut service, mut index, addresses) = setup(window, 1);
                let mut rng = rand::thread_rng();
                let mut height = 0u64;

                b.iter(|| {
                    height += 1;
                    let vote = ValidatorVote::new(addresses[0], 100, rng.gen_bool(0.9));
                    let outcome = service.process_block(&mut index, block_report(height, vec![vote]));
                    service.drain_events();
                    black_box(outcome)
                })
            },
        );
    }

    group.finish();
}

pub fn brutal_block_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18/brutal/block_processing");
    group.measurement_time(Duration::from_secs(10));

    let validator_counts = [100u32, 1_000, 10_000];

    for count in validator_counts {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("votes", count), &count, |b, &count| {
            let (mut service, mut index, addresses) = setup(1_000, count);
            let mut rng = rand::thread_rng();
            let mut height = 0u64;

            b.iter(|| {
                height += 1;
                let votes = addresses
                    .iter()
                    .map(|address| ValidatorVote::new(*address, 100, rng.gen_bool(0.95)))
                    .collect();
                let outcome = service.process_block(&mut index, block_report(height, votes));
                service.drain_events();
                black_box(outcome)
            })
        });
    }

    group.finish();
}

pub fn brutal_downtime_storm(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-18/brutal/downtime_storm");
    group.measurement_time(Duration::from_secs(10));

    let validator_counts = [100u32, 1_000];
    let window = 10u64;

    for count in validator_counts {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("all_offline", count), &count, |b, &count| {
            b.iter_batched(
                || {
                    // Everyone offline through the grace period
                    let (mut service, mut index, addresses) = setup(window, count);
                    for height in 1..=window {
                        let votes = addresses
                            .iter()
                            .map(|address| ValidatorVote::new(*address, 100, false))
                            .collect();
                        service
                            .process_block(&mut index, block_report(height, votes))
                            .expect("grace period block");
                    }
                    service.drain_events();
                    (service, index, addresses)
                },
                |(mut service, mut index, addresses)| {
                    let votes = addresses
                        .iter()
                        .map(|address| ValidatorVote::new(*address, 100, false))
                        .collect();
                    black_box(service.process_block(&mut index, block_report(window + 1, votes)))
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    brutal_window_update(c);
    brutal_block_processing(c);
    brutal_downtime_storm(c);
}
