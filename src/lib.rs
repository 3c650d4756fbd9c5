use std::fmt::Display;

use log::info;
use pathfinding::directed::bfs::bfs;

mod board;
mod heuristic;
mod search;

pub use board::{parse_board, Board, BoardError, Move, GOAL, SIDE};
pub use heuristic::{manhattan_distance, misplaced_tiles, Estimator, Heuristic};
pub use search::{search, search_with, Outcome, Search, SearchStats};

/// Whether the standard [`GOAL`] can be reached from `board`.
pub fn is_solvable(board: &Board) -> bool {
    board.is_solvable()
}

/// Which heuristic produced the returned path.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Winner {
    Manhattan,
    MisplacedTiles,
    Tie,
}

impl Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Manhattan => write!(f, "({})", Heuristic::Manhattan),
            Winner::MisplacedTiles => write!(f, "({})", Heuristic::MisplacedTiles),
            Winner::Tie => write!(
                f,
                "({} = {})",
                Heuristic::Manhattan,
                Heuristic::MisplacedTiles
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub winner: Winner,
    pub outcome: Outcome,
    pub manhattan: SearchStats,
    pub misplaced: SearchStats,
}

impl Solution {
    pub fn label(&self) -> String {
        self.winner.to_string()
    }
}

/// Searches once with each heuristic and keeps the shorter path.
pub fn solve_best(initial: &Board, goal: &Board) -> Solution {
    let manhattan = search(initial, goal, manhattan_distance);
    info!("{} : {}", Heuristic::Manhattan, manhattan.moves.len());
    let misplaced = search(initial, goal, misplaced_tiles);
    info!("{} : {}", Heuristic::MisplacedTiles, misplaced.moves.len());

    let (best, winner) = match manhattan.moves.len().cmp(&misplaced.moves.len()) {
        std::cmp::Ordering::Less => (&manhattan, Winner::Manhattan),
        std::cmp::Ordering::Greater => (&misplaced, Winner::MisplacedTiles),
        std::cmp::Ordering::Equal => (&manhattan, Winner::Tie),
    };

    Solution {
        moves: best.moves.clone(),
        winner,
        outcome: best.outcome,
        manhattan: manhattan.stats,
        misplaced: misplaced.stats,
    }
}

/// Exact distance by plain breadth-first search. Slow; meant for checking
/// results, not for solving.
pub fn reference_distance(initial: &Board, goal: &Board) -> Option<usize> {
    if !initial.can_reach(goal) {
        return None;
    }

    bfs(
        initial,
        |b| b.successors().into_iter().map(|(_, next)| next),
        |b| b == goal,
    )
    .map(|path| path.len() - 1)
}
