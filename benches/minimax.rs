//! Criterion benchmarks for the minimax hot path.
//!
//! Run with:
//!     cargo bench --bench minimax

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tictactoe_engine::engine::board::Board;
use tictactoe_engine::engine::bot_strategy::Strategy;
use tictactoe_engine::engine::minimax::{minimax_search, MinimaxParams};
use tictactoe_engine::engine::models::Marker;

struct Fixture {
    label: &'static str,
    board: Board,
    to_move: Marker,
}

fn fixtures() -> Vec<Fixture> {
    let boards = [
        ("empty", vec!["...", "...", "..."], Marker::X),
        ("one_move", vec!["...", ".X.", "..."], Marker::O),
        ("midgame", vec!["X..", ".O.", "..X"], Marker::O),
        ("endgame", vec!["XO.", "OX.", "X.O"], Marker::X),
    ];
    boards
        .into_iter()
        .map(|(label, rows, to_move)| Fixture {
            label,
            board: Board::from_rows(&rows).expect("valid fixture board"),
            to_move,
        })
        .collect()
}

fn bench_minimax(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax_search");
    group.sample_size(10);

    for fixture in fixtures() {
        for (name, params) in [
            ("table", MinimaxParams { use_transposition_table: true }),
            ("plain", MinimaxParams { use_transposition_table: false }),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, fixture.label),
                &fixture,
                |b, f| {
                    let mut rng = StdRng::seed_from_u64(42);
                    b.iter(|| minimax_search(&f.board, f.to_move, &params, &mut rng).unwrap())
                },
            );
        }
    }

    group.finish();
}

fn bench_heuristic(c: &mut Criterion) {
    let board = Board::from_rows(&["X....", ".O...", "..X..", "...O.", "....."]).expect("valid board");
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("heuristic_5x5", |b| {
        b.iter(|| {
            Strategy::Heuristic
                .select_move(&board, Marker::X, Marker::O, &mut rng)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_minimax, bench_heuristic);
criterion_main!(benches);
