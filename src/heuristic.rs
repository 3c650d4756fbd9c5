use std::fmt::Display;

use itertools::Itertools;

use crate::board::Board;

/// Estimates the number of moves left from `board` to `goal`.
pub type Estimator = fn(&Board, &Board) -> u32;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Heuristic {
    Manhattan,
    MisplacedTiles,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::Manhattan, Heuristic::MisplacedTiles];

    pub fn estimator(self) -> Estimator {
        match self {
            Heuristic::Manhattan => manhattan_distance,
            Heuristic::MisplacedTiles => misplaced_tiles,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "Manhattan",
            Heuristic::MisplacedTiles => "Misplaced Tiles",
        }
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// every tile out of place needs at least one move
pub fn misplaced_tiles(board: &Board, goal: &Board) -> u32 {
    board
        .cells()
        .iter()
        .zip_eq(goal.cells())
        .filter(|(b, g)| **b != 0 && b != g)
        .count() as u32
}

// every tile needs at least as many moves as its grid distance to home,
// and a single move only shifts one tile by one cell
pub fn manhattan_distance(board: &Board, goal: &Board) -> u32 {
    let current = board.positions();
    let home = goal.positions();

    current
        .iter()
        .zip_eq(&home)
        .skip(1) // the blank
        .map(|(&(i, j), &(gi, gj))| (i.abs_diff(gi) + j.abs_diff(gj)) as u32)
        .sum()
}
