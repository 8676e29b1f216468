//! Benchmarks for placement enumeration and play.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polycard::card::{Card, Reward};
use polycard::config::GameConfig;
use polycard::geometry::all_orientations;
use polycard::grid::CellSet;
use polycard::{ConfigurationSet, GameManager};

const CORNER_3: &[(i32, i32)] = &[(0, 0), (1, 0), (1, 1)];
const L_SHAPE_4: &[(i32, i32)] = &[(0, 0), (1, 0), (2, 0), (2, 1)];

/// Benchmark building the configuration set of one piece.
fn bench_configuration_set(c: &mut Criterion) {
    c.bench_function("configuration_set_l_shape_4", |b| {
        b.iter(|| ConfigurationSet::build(black_box(L_SHAPE_4)))
    });
}

/// Benchmark computing all orientations for a single piece.
fn bench_orientations(c: &mut Criterion) {
    c.bench_function("all_orientations", |b| {
        b.iter(|| all_orientations(black_box(CORNER_3)))
    });
}

/// Benchmark filtering a piece's placements against a half-filled card.
fn bench_valid_configurations(c: &mut Criterion) {
    let set = ConfigurationSet::build(CORNER_3);
    let mut card = Card::new(CellSet::FULL, Reward::default());
    card.place_piece(CellSet::from_coords([(0, 0), (1, 1), (2, 2), (3, 3)]));

    c.bench_function("valid_configurations", |b| {
        b.iter(|| black_box(&card).valid_configurations(&set).count())
    });
}

/// Benchmark a seeded ten-round game on the built-in setup.
fn bench_full_game(c: &mut Criterion) {
    let mut config = GameConfig::builtin().unwrap();
    config.game.seed = Some(7);
    config.game.max_turns = 10;

    let mut group = c.benchmark_group("game");
    group.sample_size(20);
    group.bench_function("builtin_10_turns", |b| {
        b.iter(|| GameManager::new(black_box(&config)).unwrap().run())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_configuration_set,
    bench_orientations,
    bench_valid_configurations,
    bench_full_game
);
criterion_main!(benches);
