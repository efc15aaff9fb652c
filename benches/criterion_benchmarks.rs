use arc_cache::config::ArcCacheConfig;
use arc_cache::ArcCache;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::num::NonZeroUsize;

const CACHE_SIZE: usize = 1_000;
const NUM_OPERATIONS: usize = 10_000;

fn make_arc<K: std::hash::Hash + Eq + Clone, V>(cap: usize) -> ArcCache<K, V> {
    let config = ArcCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    ArcCache::init(config, None)
}

// Simple linear congruential generator for reproducible benchmarks
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345) & 0x7fffffff;
        self.state
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (0x7fffffff as f64)
    }
}

// Helper function to generate Zipf-like distribution
fn zipf_sample(n: usize, skew: f64) -> Vec<usize> {
    let mut rng = SimpleRng::new(42);

    let mut norm: f64 = 0.0;
    for i in 1..=n {
        norm += 1.0 / (i as f64).powf(skew);
    }

    let mut samples = Vec::with_capacity(NUM_OPERATIONS);
    for _ in 0..NUM_OPERATIONS {
        let u: f64 = rng.next_f64();
        let mut sum: f64 = 0.0;
        let mut sample: usize = 1;

        while sample <= n {
            sum += 1.0 / (sample as f64).powf(skew) / norm;
            if sum >= u {
                break;
            }
            sample += 1;
        }

        samples.push(sample.saturating_sub(1) % n);
    }

    samples
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ARC Operations");

    {
        let mut cache = make_arc(CACHE_SIZE);
        // Two passes put every key in T2
        for _ in 0..2 {
            for i in 0..CACHE_SIZE {
                cache.get(i, || i);
            }
        }

        group.bench_function("ARC get hit (T2)", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(i % CACHE_SIZE, || i));
                }
            });
        });
    }

    group.bench_function("ARC get hit (T1 promotion)", |b| {
        b.iter_batched(
            || {
                let mut cache = make_arc(CACHE_SIZE);
                for i in 0..100 {
                    cache.get(i, || i);
                }
                cache
            },
            |mut cache| {
                for i in 0..100 {
                    black_box(cache.get(i, || i));
                }
                cache
            },
            criterion::BatchSize::SmallInput,
        );
    });

    {
        let mut cache = make_arc(CACHE_SIZE);
        let mut next = 0usize;

        group.bench_function("ARC get miss (scan)", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    next += 1;
                    black_box(cache.get(next, || next));
                }
            });
        });
    }

    group.finish();

    let samples = zipf_sample(CACHE_SIZE * 2, 0.8);
    let mut group = c.benchmark_group("ARC Mixed Access");

    for skew in [0.6, 0.8, 1.0] {
        let samples = zipf_sample(CACHE_SIZE * 2, skew);
        group.bench_with_input(BenchmarkId::new("zipf", skew), &samples, |b, samples| {
            b.iter(|| {
                let mut cache = make_arc(CACHE_SIZE);
                for &idx in samples {
                    black_box(cache.get(idx, || idx));
                }
            });
        });
    }

    // Hot set interleaved with a long one-off scan
    group.bench_function("hot set + scan", |b| {
        b.iter(|| {
            let mut cache = make_arc(CACHE_SIZE);
            for (n, &idx) in samples.iter().enumerate() {
                black_box(cache.get(idx, || idx));
                let scan_key = CACHE_SIZE * 10 + n;
                black_box(cache.get(scan_key, || scan_key));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
