//! Criterion benchmarks for forest flattening and the leaderboard pass

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use diemtrack::leaderboard::{flatten, LeaderboardEngine, SortMode};
use diemtrack::types::{UnifiedEntry, UsageAmount};

/// Build a forest of `groups` top-level groups with `children` SKUs each;
/// every other group starts expanded
fn build_forest(groups: usize, children: usize) -> Vec<UnifiedEntry> {
    (0..groups)
        .map(|g| {
            let total = children as f64;
            let mut group = UnifiedEntry::group(
                &format!("group-{}", g),
                &format!("Group {}", g),
                UsageAmount::new(total, total / 10.0),
            );
            group.is_expanded = g % 2 == 0;
            for c in 0..children {
                group.add_child(UnifiedEntry::sku(
                    &format!("sku-{}-{}", g, c),
                    &format!("Sku {} {}", g, c),
                    UsageAmount::new(1.0, 0.1),
                ));
            }
            group
        })
        .collect()
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard");

    for (groups, children) in [(100, 20), (500, 50)] {
        let forest = build_forest(groups, children);
        group.bench_with_input(
            BenchmarkId::new("flatten", format!("{}x{}", groups, children)),
            &forest,
            |b, forest| {
                b.iter(|| flatten(black_box(forest)));
            },
        );
    }

    group.finish();
}

fn bench_engine_rows(c: &mut Criterion) {
    let mut engine = LeaderboardEngine::new();
    engine.set_forest(build_forest(100, 20));
    engine.set_sort_mode(SortMode::UsageDesc);

    let mut group = c.benchmark_group("leaderboard");
    group.bench_function("engine_rows_100x20", |b| {
        b.iter(|| engine.rows());
    });
    group.finish();
}

criterion_group!(benches, bench_flatten, bench_engine_rows);
criterion_main!(benches);
