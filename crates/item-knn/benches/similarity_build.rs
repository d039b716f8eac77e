//! Benchmarks for the similarity build
//!
//! Run with: cargo bench --package item-knn
//!
//! Uses a seeded synthetic rating matrix with a long-tailed item popularity,
//! so most item pairs share few or no raters.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use item_knn::{BuildConfig, Rating, RatingMatrix, SimilarityKind, build_model};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_USERS: u64 = 2_000;
const NUM_ITEMS: u64 = 1_000;
const RATINGS_PER_USER: usize = 40;

fn synthetic_ratings() -> anyhow::Result<RatingMatrix> {
    let mut rng = StdRng::seed_from_u64(1_000_003);
    let mut ratings = Vec::with_capacity(NUM_USERS as usize * RATINGS_PER_USER);
    for user in 0..NUM_USERS {
        for _ in 0..RATINGS_PER_USER {
            // squaring skews towards low ids: a few popular items, a long tail
            let draw: f64 = rng.random();
            let item = ((draw * draw) * NUM_ITEMS as f64) as u64;
            let value = rng.random_range(1..=5) as f64;
            ratings.push(Rating::new(user, item, value));
        }
    }
    // keep the first rating of every (user, item) pair
    ratings.sort_by_key(|r| (r.user, r.item));
    ratings.dedup_by_key(|r| (r.user, r.item));
    Ok(RatingMatrix::from_ratings(ratings)?)
}

fn bench_min_common_users(c: &mut Criterion) {
    let matrix = synthetic_ratings().expect("Failed to generate ratings");
    let mut group = c.benchmark_group("build_by_min_common_users");
    group.sample_size(10);

    for threshold in [0usize, 2, 5, 10] {
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                let config = BuildConfig::new(20).with_min_common_users(threshold);
                b.iter(|| {
                    let model = build_model(black_box(&matrix), config.clone()).unwrap();
                    black_box(model)
                })
            },
        );
    }
    group.finish();
}

fn bench_similarity_kinds(c: &mut Criterion) {
    let matrix = synthetic_ratings().expect("Failed to generate ratings");
    let mut group = c.benchmark_group("build_by_similarity");
    group.sample_size(10);

    for kind in [
        SimilarityKind::Cosine,
        SimilarityKind::Pearson,
        SimilarityKind::ConditionalProbability,
    ] {
        group.bench_function(format!("{:?}", kind), |b| {
            let config = BuildConfig::new(20)
                .with_min_common_users(2)
                .with_similarity(kind);
            b.iter(|| {
                let model = build_model(black_box(&matrix), config.clone()).unwrap();
                black_box(model)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_min_common_users, bench_similarity_kinds);
criterion_main!(benches);
