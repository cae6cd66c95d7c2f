use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lazyseq::LazySeq;

// ============================================================================
// Construction Benchmarks
// ============================================================================

fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for n in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("iterate_limit", n), &n, |b, &n| {
            b.iter(|| counter().limit(black_box(n)).count());
        });

        group.bench_with_input(BenchmarkId::new("generate_limit", n), &n, |b, &n| {
            b.iter(|| LazySeq::generate(|| 1u64).limit(black_box(n)).to_vec());
        });
    }

    group.finish();
}

// ============================================================================
// Combinator Benchmarks
// ============================================================================

fn benchmark_combinators(c: &mut Criterion) {
    let mut group = c.benchmark_group("combinators");

    for n in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("map", n), &n, |b, &n| {
            b.iter(|| counter().map(|x| x * 3).limit(black_box(n)).to_vec());
        });

        // Half the elements are skipped, so the walk is twice as long
        group.bench_with_input(BenchmarkId::new("filter", n), &n, |b, &n| {
            b.iter(|| {
                counter()
                    .filter(|x| x % 2 == 0)
                    .limit(black_box(n))
                    .to_vec()
            });
        });

        group.bench_with_input(BenchmarkId::new("take_while", n), &n, |b, &n| {
            let bound = n as u64;
            b.iter(|| counter().take_while(move |x| *x < bound).count());
        });

        group.bench_with_input(BenchmarkId::new("zip_with", n), &n, |b, &n| {
            b.iter(|| {
                counter()
                    .zip_with(&counter().map(|x| x * 2), |a, b| a + b)
                    .limit(black_box(n))
                    .reduce(0, |acc, x| acc + x)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Terminal Operation Benchmarks
// ============================================================================

fn benchmark_terminal(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    // Cached sequence: measures the walk alone
    let cached = counter().limit(10_000);
    cached.count();

    group.bench_function("count_cached", |b| {
        b.iter(|| black_box(&cached).count());
    });

    group.bench_function("reduce_cached", |b| {
        b.iter(|| black_box(&cached).reduce(0u64, |acc, x| acc + x));
    });

    group.bench_function("iter_cached", |b| {
        b.iter(|| black_box(&cached).iter().sum::<u64>());
    });

    group.bench_function("find_first_filtered", |b| {
        b.iter(|| {
            counter()
                .filter(|x| x % 7 == 0)
                .find_first(|x| *x > black_box(5_000))
        });
    });

    group.finish();
}

// ============================================================================
// Helper Functions
// ============================================================================

fn counter() -> LazySeq<u64> {
    LazySeq::iterate(0, |x| x + 1)
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_combinators,
    benchmark_terminal,
);
criterion_main!(benches);
