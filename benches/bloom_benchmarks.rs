use bloom_trials::{
    BloomFilter, FilterConfig, FilterConfigBuilder, HashVariant, TrialHarness,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

// Helper to create test data
fn generate_test_data(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(0xB100);
    (0..count).map(|_| rng.random_range(0..1_000_000)).collect()
}

fn create_config(variant: HashVariant, capacity: usize) -> FilterConfig {
    FilterConfigBuilder::default()
        .universe_size(1_000_000)
        .capacity(capacity)
        .bit_array_length(capacity * 10)
        .num_hashes(7)
        .hash_variant(variant)
        .build()
        .expect("Failed to build FilterConfig")
}

fn variant_name(variant: HashVariant) -> &'static str {
    match variant {
        HashVariant::SeededReHash => "seeded_rehash",
        HashVariant::UniversalAffine => "universal_affine",
    }
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_operations");

    for capacity in [100, 1_000, 10_000] {
        let test_data = generate_test_data(capacity);
        for variant in HashVariant::ALL {
            group.bench_with_input(
                BenchmarkId::new(variant_name(variant), capacity),
                &test_data,
                |b, data| {
                    b.iter_batched(
                        || {
                            BloomFilter::new(create_config(variant, capacity))
                                .expect("Failed to create filter")
                        },
                        |mut filter| {
                            for &x in data {
                                filter.add(black_box(x)).unwrap();
                            }
                            filter
                        },
                        criterion::BatchSize::SmallInput,
                    );
                },
            );
        }
    }
    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains_operations");

    for capacity in [100, 1_000, 10_000] {
        let test_data = generate_test_data(capacity);
        for variant in HashVariant::ALL {
            let mut filter = BloomFilter::new(create_config(variant, capacity))
                .expect("Failed to create filter");
            for &x in &test_data {
                filter.add(x).unwrap();
            }
            group.bench_with_input(
                BenchmarkId::new(variant_name(variant), capacity),
                &test_data,
                |b, data| {
                    b.iter(|| {
                        for &x in data {
                            black_box(filter.contains(black_box(x)).unwrap());
                        }
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_false_positive_trial(c: &mut Criterion) {
    let mut group = c.benchmark_group("false_positive_trial");
    group.sample_size(10);

    let data = generate_test_data(10_000);
    for variant in HashVariant::ALL {
        let mut harness = TrialHarness::with_seed(data.clone(), 1_000_000, 1_000, 1)
            .expect("Failed to create harness");
        group.bench_function(variant_name(variant), |b| {
            b.iter(|| harness.false_positive_rate(1, 7, 10, variant).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_add,
    bench_contains,
    bench_false_positive_trial
);
criterion_main!(benches);
