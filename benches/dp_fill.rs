use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use olo::{optimal_leaf_ordering, DistanceMatrix, LinkageRow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds a balanced-ish binary linkage tree over `n` leaves by repeatedly
/// merging random pairs from a shuffled pool, which is always a valid
/// linkage shape regardless of merge order.
fn random_linkage(n: usize, rng: &mut StdRng) -> Vec<LinkageRow> {
    let mut pool: Vec<u32> = (0..n as u32).collect();
    let mut rows = Vec::with_capacity(n - 1);
    let mut next_internal = n as u32;
    for height in 0..n - 1 {
        let i = rng.gen_range(0..pool.len());
        let left = pool.swap_remove(i);
        let j = rng.gen_range(0..pool.len());
        let right = pool.swap_remove(j);
        rows.push(LinkageRow { left, right, height: height as f64, size: 0 });
        pool.push(next_internal);
        next_internal += 1;
    }
    rows
}

fn random_square_distances(n: usize, rng: &mut StdRng) -> Vec<f64> {
    let mut d = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let v: f64 = rng.gen_range(0.0..100.0);
            d[i * n + j] = v;
            d[j * n + i] = v;
        }
    }
    d
}

fn dp_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_leaf_ordering");

    for n in [16usize, 64, 256] {
        let mut rng = StdRng::seed_from_u64(42);
        let z = random_linkage(n, &mut rng);
        let d = random_square_distances(n, &mut rng);

        group.bench_function(BenchmarkId::new("n", n), move |b| {
            b.iter_batched(
                || (z.clone(), DistanceMatrix::Square(d.clone())),
                |(z, d)| black_box(optimal_leaf_ordering(z, d).unwrap()),
                criterion::BatchSize::LargeInput,
            );
        });
    }
}

criterion_group!(benches, dp_fill);
criterion_main!(benches);
