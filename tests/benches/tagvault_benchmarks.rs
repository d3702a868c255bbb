//! # TagVault Benchmarks
//!
//! | Service | Operation | Target |
//! |---------|-----------|--------|
//! | tv-02 Bitmap Filter | AND / OR / COMPLEX over 10k cards | < 5ms |
//! | tv-01 Set Algebra | intersect, cache hit | < 10µs |
//! | tv-01 Set Algebra | intersect, cache disabled | < 1ms |

use std::collections::BTreeSet;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_types::{Bitmap, CardBitmapRecord, TenantKey};
use tv_01_set_algebra::{SetAlgebraApi, SetAlgebraService, TagSet};
use tv_02_bitmap_filter::{BitmapFilterApi, BitmapFilterEngine, FilterRequest};

const TAG_POOL: Bitmap = 64;

fn tenant() -> TenantKey {
    TenantKey::new("bench-user", "bench-workspace")
}

fn generate_records(tenant: &TenantKey, count: usize) -> Vec<CardBitmapRecord> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let tags: BTreeSet<Bitmap> = (0..rng.gen_range(1..6))
                .map(|_| rng.gen_range(1..=TAG_POOL))
                .collect();
            CardBitmapRecord {
                card_id: format!("card-{i}"),
                tenant_key: tenant.clone(),
                card_bitmap: 10_000 + i as Bitmap,
                tag_bitmaps: tags,
                checksum: String::new(),
            }
        })
        .collect()
}

// ============================================================================
// TV-02: Bitmap Filter
// ============================================================================

fn bench_bitmap_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("tv-02-bitmap-filter");
    group.measurement_time(Duration::from_secs(5));

    let engine = BitmapFilterEngine::new();
    let tenant = tenant();

    for size in [100, 1_000, 10_000] {
        let records = generate_records(&tenant, size);
        group.throughput(Throughput::Elements(size as u64));

        let and = FilterRequest::and([1, 2]);
        group.bench_with_input(BenchmarkId::new("and", size), &records, |b, records| {
            b.iter(|| black_box(engine.filter(&and, &tenant, records)))
        });

        let or = FilterRequest::or([1, 2, 3]);
        group.bench_with_input(BenchmarkId::new("or", size), &records, |b, records| {
            b.iter(|| black_box(engine.filter(&or, &tenant, records)))
        });

        let complex = FilterRequest::complex("(1 AND 2) OR (3 NOT 4)");
        group.bench_with_input(BenchmarkId::new("complex", size), &records, |b, records| {
            b.iter(|| black_box(engine.filter(&complex, &tenant, records)))
        });
    }

    group.finish();
}

// ============================================================================
// TV-01: Set Algebra
// ============================================================================

fn bench_set_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("tv-01-set-algebra");

    let tenant = tenant();
    let sets: Vec<TagSet> = (0..4)
        .map(|n| TagSet::from_iter((0..5_000).filter(|i| i % (n + 2) == 0).map(|i| format!("card-{i}"))))
        .collect();

    let cached = SetAlgebraService::new();
    cached.intersect(Some(&tenant), &sets);
    group.bench_function("intersect_cached", |b| {
        b.iter(|| black_box(cached.intersect(Some(&tenant), &sets)))
    });

    let uncached = SetAlgebraService::with_cache_capacity(0);
    group.bench_function("intersect_uncached", |b| {
        b.iter(|| black_box(uncached.intersect(Some(&tenant), &sets)))
    });

    group.finish();
}

criterion_group!(benches, bench_bitmap_filter, bench_set_algebra);

criterion_main!(benches);
