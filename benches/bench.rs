use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eight_puzzle::{parse_board, search, solve_best, Heuristic, GOAL};

// (name, board); optimal move counts alongside
const BOARDS: &[(&str, &str)] = &[
    ("simple", "_ 1 3/4 2 5/7 8 6"),  // 4 moves
    ("medium", "8 7 2/5 _ 3/1 4 6"),  // 16 moves
    ("hardest", "8 6 7/2 5 4/3 _ 1"), // 31 moves
];

fn criterion_bench(c: &mut Criterion) {
    for (name, text) in BOARDS {
        let board = parse_board(text).unwrap();

        for h in Heuristic::ALL {
            c.bench_function(&format!("{name} {h}"), |b| {
                b.iter(|| search(black_box(&board), black_box(&GOAL), h.estimator()))
            });
        }
    }

    c.bench_function("medium solve_best", |b| {
        let board = parse_board(BOARDS[1].1).unwrap();
        b.iter(|| solve_best(black_box(&board), black_box(&GOAL)))
    });
}

criterion_group!(benches, criterion_bench);
criterion_main!(benches);
