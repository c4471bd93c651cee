//! Insert, query, and codec throughput

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use slicebloom::{BloomFilter, FilterConfig, HashAlgorithm};

fn random_values(count: usize) -> Vec<[u8; 16]> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen()).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.measurement_time(Duration::from_secs(5));

    for &capacity in &[1_000usize, 100_000] {
        let values = random_values(capacity);
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &values,
            |b, values| {
                b.iter(|| {
                    let mut filter =
                        BloomFilter::new(FilterConfig::new(values.len() as u64, 0.001)).unwrap();
                    for value in values {
                        filter.insert(black_box(value.as_slice())).unwrap();
                    }
                    black_box(filter.bits_set())
                })
            },
        );
    }
    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");
    let values = random_values(10_000);
    let mut filter = BloomFilter::new(FilterConfig::new(10_000, 0.001)).unwrap();
    for value in &values {
        filter.insert(value.as_slice()).unwrap();
    }
    let outsiders = random_values(10_000);

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("hit", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for value in &values {
                if filter.contains(black_box(value.as_slice())) {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.bench_function("miss", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for value in &outsiders {
                if filter.contains(black_box(value.as_slice())) {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.finish();
}

fn bench_digest_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert-by-algorithm");
    let values = random_values(1_000);

    for algorithm in HashAlgorithm::ALL {
        group.bench_with_input(
            BenchmarkId::new("algorithm", algorithm.name()),
            &algorithm,
            |b, &algorithm| {
                b.iter(|| {
                    let config = FilterConfig::new(1_000, 0.001).with_hash_algorithm(algorithm);
                    let mut filter = BloomFilter::new(config).unwrap();
                    for value in &values {
                        filter.insert(value.as_slice()).unwrap();
                    }
                    black_box(filter.len())
                })
            },
        );
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let values = random_values(10_000);
    let mut filter = BloomFilter::new(FilterConfig::new(10_000, 0.001)).unwrap();
    for value in &values {
        filter.insert(value.as_slice()).unwrap();
    }
    let bytes = filter.to_bytes();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode", |b| b.iter(|| black_box(filter.to_bytes())));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(BloomFilter::from_bytes(&bytes, None).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_contains,
    bench_digest_algorithms,
    bench_codec
);
criterion_main!(benches);
