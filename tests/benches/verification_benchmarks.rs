//! # DHT Node Benchmarks
//!
//! | Area | Path measured |
//! |------|---------------|
//! | Verification | offline verify with a cached author key |
//! | Resolution | cold online resolve through the direct-peer tier |
//! | Block cache | `has` on absent and hot blocks through both cache layers |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dht_01_record_verification::test_utils::{ScriptedDht, ScriptedPeerQuery};
use dht_01_record_verification::{
    sign_record, InMemoryKeyCache, KeyCache, NamespacedValidator, OperationContext,
    RecordSignatureChecker, RecordValidator, RecordVerificationApi, RecordVerificationService,
    ValidationError, VerificationMode, VerifierConfig, VerifierDependencies,
};
use dht_02_block_cache::{cached_blockstore, Blockstore, CacheOpts, InMemoryBlockstore};
use shared_crypto::Keypair;
use shared_types::{Block, Cid, PeerId, Record};
use tokio::runtime::Runtime;

struct AcceptAll;

impl RecordValidator for AcceptAll {
    fn verify_structure(&self, _record: &Record) -> Result<(), ValidationError> {
        Ok(())
    }
}

fn service(peers: ScriptedPeerQuery, cache: Arc<InMemoryKeyCache>) -> RecordVerificationService {
    let validator = NamespacedValidator::with_public_keys().with_namespace("v", Arc::new(AcceptAll));
    RecordVerificationService::new(
        VerifierDependencies {
            key_cache: cache,
            peer_query: Arc::new(peers),
            dht: Arc::new(ScriptedDht::new()),
            validator: Arc::new(validator),
            signatures: Arc::new(RecordSignatureChecker::new()),
        },
        VerifierConfig::default(),
    )
}

fn record(author: &Keypair, i: usize) -> Record {
    sign_record(
        author,
        Record::new(format!("/v/item-{}", i).into_bytes(), vec![0xAB; 128], PeerId::new([0; 32])),
    )
}

// ============================================================================
// Verification
// ============================================================================

fn bench_offline_verification(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("record-verification");
    group.measurement_time(Duration::from_secs(5));

    for (name, author) in [
        ("ed25519", Keypair::generate_ed25519()),
        ("secp256k1", Keypair::generate_secp256k1()),
    ] {
        let cache = Arc::new(InMemoryKeyCache::new());
        cache.store(author.peer_id(), author.public()).unwrap();
        let svc = service(ScriptedPeerQuery::new(), cache);
        let rec = record(&author, 0);
        let ctx = OperationContext::background();

        group.bench_function(BenchmarkId::new("offline_cached_key", name), |b| {
            b.iter(|| {
                rt.block_on(svc.verify(&ctx, black_box(&rec), VerificationMode::Offline))
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_cold_resolution(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("key-resolution");

    let authors: Vec<Keypair> = (0..64).map(|_| Keypair::generate_ed25519()).collect();
    let peers = authors
        .iter()
        .fold(ScriptedPeerQuery::new(), |peers, author| peers.serving(&author.public()));
    let peers = Arc::new(peers);

    group.throughput(Throughput::Elements(authors.len() as u64));
    group.bench_function("direct_peer_cold_cache", |b| {
        b.iter(|| {
            // fresh cache each round so every author goes to the network
            let resolver = dht_01_record_verification::PeerKeyResolver::new(
                Arc::new(InMemoryKeyCache::new()),
                peers.clone(),
                Arc::new(ScriptedDht::new()),
                &VerifierConfig::default(),
            );
            rt.block_on(async {
                for author in &authors {
                    resolver
                        .resolve(
                            &OperationContext::background(),
                            &author.peer_id(),
                            VerificationMode::Online,
                        )
                        .await
                        .unwrap();
                }
            })
        })
    });

    group.finish();
}

// ============================================================================
// Block cache
// ============================================================================

fn bench_block_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("block-cache");

    let blocks: Vec<Block> = (0..10_000u32)
        .map(|i| Block::new(i.to_le_bytes().to_vec()))
        .collect();
    let absent: Vec<Cid> = (0..1_000u32)
        .map(|i| Cid::of(format!("absent-{}", i).as_bytes()))
        .collect();

    for (name, opts) in [
        ("uncached", CacheOpts::disabled()),
        ("default", CacheOpts::default()),
    ] {
        let store = cached_blockstore(
            Arc::new(InMemoryBlockstore::with_blocks(blocks.iter().cloned())),
            opts,
        )
        .unwrap();

        group.throughput(Throughput::Elements(absent.len() as u64));
        group.bench_with_input(BenchmarkId::new("has_absent", name), &absent, |b, cids| {
            b.iter(|| {
                for cid in cids {
                    black_box(store.has(cid).unwrap());
                }
            })
        });

        let hot: Vec<Cid> = blocks.iter().take(100).map(Block::cid).collect();
        group.throughput(Throughput::Elements(hot.len() as u64));
        group.bench_with_input(BenchmarkId::new("has_hot", name), &hot, |b, cids| {
            b.iter(|| {
                for cid in cids {
                    black_box(store.has(cid).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_offline_verification,
    bench_cold_resolution,
    bench_block_cache
);
criterion_main!(benches);
