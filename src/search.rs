use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Board, Move};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Boards taken off the frontier and expanded.
    pub expanded: usize,
    /// Successor boards produced, including ones thrown away.
    pub generated: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Solved,
    /// Inversion parity rules the goal out; nothing was searched.
    Unsolvable,
    /// The frontier ran dry without meeting the goal.
    Exhausted,
}

#[derive(Clone, Debug)]
pub struct Search {
    pub moves: Vec<Move>,
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl Search {
    fn empty(outcome: Outcome, stats: SearchStats) -> Search {
        Search {
            moves: Vec::new(),
            outcome,
            stats,
        }
    }
}

// nodes are never mutated once pushed; parents always have a lower index
struct Node {
    board: Board,
    cost: u32,
    estimate: u32,
    parent: Option<(usize, Move)>,
}

impl Node {
    fn priority(&self) -> u32 {
        self.cost + self.estimate
    }
}

#[derive(Eq, PartialEq)]
struct Entry {
    priority: u32,
    estimate: u32,
    index: usize,
}

// BinaryHeap is a max-heap, so everything is reversed: lowest priority
// first, then lowest estimate, then oldest node
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.estimate.cmp(&self.estimate))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open set. `best` maps each frontier board to the node currently
/// standing for it; heap entries pointing anywhere else are stale and
/// get skipped on the way out.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<Entry>,
    best: FxHashMap<Board, usize>,
}

impl Frontier {
    fn push(&mut self, nodes: &[Node], index: usize) {
        let node = &nodes[index];
        self.best.insert(node.board, index);
        self.heap.push(Entry {
            priority: node.priority(),
            estimate: node.estimate,
            index,
        });
    }

    fn pop(&mut self, nodes: &[Node]) -> Option<usize> {
        while let Some(entry) = self.heap.pop() {
            let board = &nodes[entry.index].board;
            if self.best.get(board) == Some(&entry.index) {
                self.best.remove(board);
                return Some(entry.index);
            }
        }

        None
    }

    fn get(&self, board: &Board) -> Option<usize> {
        self.best.get(board).copied()
    }
}

fn reconstruct(nodes: &[Node], mut index: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    while let Some((parent, mov)) = nodes[index].parent {
        moves.push(mov);
        index = parent;
    }

    moves.reverse();
    moves
}

/// Finds a shortest sequence of moves from `initial` to `goal`.
///
/// `heuristic` must be admissible for the result to be optimal. Returns an
/// empty path if `goal` cannot be reached.
pub fn search<H>(initial: &Board, goal: &Board, heuristic: H) -> Search
where
    H: Fn(&Board, &Board) -> u32,
{
    search_with(initial, goal, heuristic, |_| {})
}

/// Like [`search`], calling `on_expand` for every board as it is expanded.
pub fn search_with<H, F>(initial: &Board, goal: &Board, heuristic: H, mut on_expand: F) -> Search
where
    H: Fn(&Board, &Board) -> u32,
    F: FnMut(&Board),
{
    let mut stats = SearchStats::default();

    if !initial.can_reach(goal) {
        info!("{:?} cannot reach {:?}", initial.cells(), goal.cells());
        debug!("{:?}: nothing searched", Outcome::Unsolvable);
        return Search::empty(Outcome::Unsolvable, stats);
    }

    let mut nodes = vec![Node {
        board: *initial,
        cost: 0,
        estimate: heuristic(initial, goal),
        parent: None,
    }];
    let mut open = Frontier::default();
    let mut closed = FxHashSet::default();
    open.push(&nodes, 0);

    while let Some(current) = open.pop(&nodes) {
        let board = nodes[current].board;
        if board == *goal {
            let moves = reconstruct(&nodes, current);
            debug!(
                "{:?} in {} moves, expanded {}, generated {}, {} nodes",
                Outcome::Solved,
                moves.len(),
                stats.expanded,
                stats.generated,
                nodes.len()
            );
            return Search {
                moves,
                outcome: Outcome::Solved,
                stats,
            };
        }

        closed.insert(board);
        stats.expanded += 1;
        on_expand(&board);

        let cost = nodes[current].cost + 1;
        for (mov, next) in board.successors() {
            stats.generated += 1;
            if closed.contains(&next) {
                continue;
            }

            let estimate = heuristic(&next, goal);
            if let Some(existing) = open.get(&next) {
                // an equal or better route to this board is already queued
                if nodes[existing].priority() <= cost + estimate {
                    continue;
                }
            }

            nodes.push(Node {
                board: next,
                cost,
                estimate,
                parent: Some((current, mov)),
            });
            open.push(&nodes, nodes.len() - 1);
        }
    }

    warn!(
        "frontier exhausted after {} expansions without reaching {:?}",
        stats.expanded,
        goal.cells()
    );
    debug!(
        "{:?}: expanded {}, generated {}, {} nodes",
        Outcome::Exhausted,
        stats.expanded,
        stats.generated,
        nodes.len()
    );
    Search::empty(Outcome::Exhausted, stats)
}

#[cfg(test)]
mod test {
    use pathfinding::directed::astar::astar;

    use super::*;
    use crate::board::{parse_board, GOAL};
    use crate::heuristic::{manhattan_distance, misplaced_tiles, Heuristic};
    use crate::reference_distance;

    const BOARDS: &[&str] = &[
        "1 2 3/4 5 6/7 _ 8",
        "_ 1 3/4 2 5/7 8 6",
        "4 1 3/7 2 6/_ 5 8",
        "5 1 3/4 _ 2/7 8 6",
        "_ 8 2/5 1 3/4 7 6",
        "5 8 _/1 7 2/4 6 3",
        "8 7 2/5 _ 3/1 4 6",
    ];

    #[test]
    fn start_at_goal() {
        for h in Heuristic::ALL {
            let result = search(&GOAL, &GOAL, h.estimator());
            assert_eq!(result.outcome, Outcome::Solved);
            assert!(result.moves.is_empty());
            assert_eq!(result.stats.expanded, 0);
        }
    }

    #[test]
    fn single_move() {
        let board = parse_board("1 2 3/4 5 6/7 _ 8").unwrap();
        for h in Heuristic::ALL {
            let result = search(&board, &GOAL, h.estimator());
            assert_eq!(result.moves, vec![Move::Right]);
        }
    }

    #[test]
    fn unsolvable_never_expands() {
        let board = parse_board("1 2 3/4 5 6/8 7 _").unwrap();
        let mut expansions = 0;
        let result = search_with(&board, &GOAL, manhattan_distance, |_| expansions += 1);

        assert_eq!(result.outcome, Outcome::Unsolvable);
        assert!(result.moves.is_empty());
        assert_eq!(result.stats, SearchStats::default());
        assert_eq!(expansions, 0);
    }

    #[test]
    fn four_move_board() {
        let board = parse_board("_ 1 3/4 2 5/7 8 6").unwrap();
        for h in Heuristic::ALL {
            let result = search(&board, &GOAL, h.estimator());
            assert_eq!(result.moves.len(), 4);
            assert_eq!(board.apply(&result.moves), Some(GOAL));
        }
    }

    #[test]
    fn paths_are_valid_and_optimal() {
        for text in BOARDS {
            let board = parse_board(text).unwrap();
            let expected = reference_distance(&board, &GOAL).unwrap();

            for h in Heuristic::ALL {
                let result = search(&board, &GOAL, h.estimator());
                assert_eq!(result.outcome, Outcome::Solved);
                assert_eq!(result.moves.len(), expected, "{h} on {text}");
                assert_eq!(board.apply(&result.moves), Some(GOAL), "{h} on {text}");
            }
        }
    }

    #[test]
    fn matches_reference_astar() {
        let board = parse_board("8 7 6/5 4 3/2 1 _").unwrap();
        let (_, cost) = astar(
            &board,
            |b| b.successors().into_iter().map(|(_, n)| (n, 1u32)),
            |b| manhattan_distance(b, &GOAL),
            |b| *b == GOAL,
        )
        .unwrap();

        let result = search(&board, &GOAL, manhattan_distance);
        assert_eq!(result.moves.len(), cost as usize);
        assert_eq!(cost, 30);
        assert_eq!(board.apply(&result.moves), Some(GOAL));
    }

    #[test]
    fn no_board_expanded_twice() {
        for text in BOARDS {
            let board = parse_board(text).unwrap();
            for h in Heuristic::ALL {
                let mut seen = FxHashSet::default();
                let result = search_with(&board, &GOAL, h.estimator(), |b| {
                    assert!(seen.insert(*b), "{b} expanded twice");
                });
                assert_eq!(seen.len(), result.stats.expanded);
            }
        }
    }

    #[test]
    fn manhattan_expands_less() {
        let board = parse_board("8 7 2/5 _ 3/1 4 6").unwrap();
        let manhattan = search(&board, &GOAL, manhattan_distance);
        let misplaced = search(&board, &GOAL, misplaced_tiles);

        assert_eq!(manhattan.moves.len(), 16);
        assert_eq!(misplaced.moves.len(), 16);
        assert!(manhattan.stats.expanded < misplaced.stats.expanded);
        assert!(manhattan.stats.generated < misplaced.stats.generated);
    }

    #[test]
    fn blind_search_is_still_optimal() {
        let board = parse_board("5 1 3/4 _ 2/7 8 6").unwrap();
        let blind = search(&board, &GOAL, |_, _| 0);
        let guided = search(&board, &GOAL, manhattan_distance);

        assert_eq!(blind.moves.len(), 12);
        assert_eq!(guided.moves.len(), 12);
        assert!(guided.stats.expanded < blind.stats.expanded);
    }

    #[test]
    fn custom_goal() {
        let goal = parse_board("_ 1 2/3 4 5/6 7 8").unwrap();
        let result = search(&GOAL, &goal, manhattan_distance);

        assert_eq!(result.moves.len(), 22);
        assert_eq!(GOAL.apply(&result.moves), Some(goal));

        let swapped = parse_board("_ 2 1/3 4 5/6 7 8").unwrap();
        let result = search(&GOAL, &swapped, manhattan_distance);
        assert_eq!(result.outcome, Outcome::Unsolvable);
        assert!(result.moves.is_empty());
    }

    #[test]
    fn stale_entries_are_skipped() {
        let board = parse_board("5 8 _/1 7 2/4 6 3").unwrap();
        let nodes: Vec<Node> = board
            .successors()
            .into_iter()
            .map(|(_, b)| Node {
                board: b,
                cost: 3,
                estimate: 0,
                parent: None,
            })
            .chain([Node {
                board: board.successors()[0].1,
                cost: 1,
                estimate: 0,
                parent: None,
            }])
            .collect();

        let mut open = Frontier::default();
        for index in 0..nodes.len() {
            open.push(&nodes, index);
        }

        // the cheaper duplicate replaced the first entry
        assert_eq!(open.get(&nodes[0].board), Some(2));
        assert_eq!(open.pop(&nodes), Some(2));
        assert_eq!(open.pop(&nodes), Some(1));
        assert_eq!(open.pop(&nodes), None);
    }
}
