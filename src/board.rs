use std::{
    fmt::{Display, Write},
    ops::Index,
};

use smallvec::SmallVec;
use thiserror::Error;

pub const SIDE: usize = 3;
const CELLS: usize = SIDE * SIDE;
const BLANK: u8 = 0;

/// The standard goal: tiles in order with the blank bottom-right.
pub const GOAL: Board = Board {
    cells: [1, 2, 3, 4, 5, 6, 7, 8, BLANK],
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("expected {side} rows, found {rows}", side = SIDE)]
    RowCount { rows: usize },
    #[error("row {row} has {len} cells, expected {side}", side = SIDE)]
    RowLength { row: usize, len: usize },
    #[error("tile {value} is out of range 0..={max}", max = CELLS - 1)]
    OutOfRange { value: u8 },
    #[error("tile {value} appears more than once")]
    Duplicate { value: u8 },
    #[error("unexpected character {ch:?} in board")]
    InvalidCharacter { ch: char },
    #[error("board is empty")]
    Empty,
}

/// An immutable 3×3 board. Always holds a permutation of `0..=8`,
/// with `0` as the blank.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [u8; CELLS],
}

/// Direction the blank travels.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Generation order for successors.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub const fn reverse(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Move::Up => 'U',
            Move::Down => 'D',
            Move::Left => 'L',
            Move::Right => 'R',
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char(self.letter())
    }
}

impl Board {
    pub fn new(from: Vec<Vec<u8>>) -> Result<Board, BoardError> {
        if from.len() != SIDE {
            return Err(BoardError::RowCount { rows: from.len() });
        }

        let mut cells = [BLANK; CELLS];
        for (i, row) in from.iter().enumerate() {
            if row.len() != SIDE {
                return Err(BoardError::RowLength {
                    row: i,
                    len: row.len(),
                });
            }

            cells[i * SIDE..(i + 1) * SIDE].copy_from_slice(row);
        }

        Board::from_cells(cells)
    }

    fn from_cells(cells: [u8; CELLS]) -> Result<Board, BoardError> {
        let mut seen = [false; CELLS];
        for &value in &cells {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(BoardError::OutOfRange { value })?;
            if *slot {
                return Err(BoardError::Duplicate { value });
            }
            *slot = true;
        }

        // nine in-range values without duplicates means every tile is present
        Ok(Board { cells })
    }

    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    pub fn rows(&self) -> [[u8; SIDE]; SIDE] {
        std::array::from_fn(|i| std::array::from_fn(|j| self[(i, j)]))
    }

    /// Row/column of every value, indexed by the value itself.
    pub fn positions(&self) -> [(usize, usize); CELLS] {
        let mut result = [(0, 0); CELLS];
        for (ix, &value) in self.cells.iter().enumerate() {
            result[value as usize] = (ix / SIDE, ix % SIDE);
        }
        result
    }

    pub fn position_of(&self, value: u8) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&c| c == value)
            .map(|ix| (ix / SIDE, ix % SIDE))
    }

    pub fn blank(&self) -> (usize, usize) {
        // NB: the permutation invariant guarantees a blank exists
        let ix = self.cells.iter().position(|&c| c == BLANK).unwrap_or(0);
        (ix / SIDE, ix % SIDE)
    }

    /// Moves the blank one step, producing a new board. `None` if the
    /// blank would leave the grid.
    pub fn slide(&self, mov: Move) -> Option<Board> {
        let (i, j) = self.blank();
        let (di, dj) = mov.delta();
        let target_i = i.checked_add_signed(di).filter(|&x| x < SIDE)?;
        let target_j = j.checked_add_signed(dj).filter(|&x| x < SIDE)?;

        let mut cells = self.cells;
        cells.swap(i * SIDE + j, target_i * SIDE + target_j);
        Some(Board { cells })
    }

    pub fn successors(&self) -> SmallVec<[(Move, Board); 4]> {
        Move::ALL
            .iter()
            .filter_map(|&m| self.slide(m).map(|b| (m, b)))
            .collect()
    }

    /// Plays `moves` in order. `None` if any of them is illegal.
    pub fn apply(&self, moves: &[Move]) -> Option<Board> {
        moves.iter().try_fold(*self, |b, &m| b.slide(m))
    }

    /// Pairs of tiles out of order in a row-major scan, ignoring the blank.
    pub fn inversions(&self) -> u32 {
        let tiles: SmallVec<[u8; CELLS]> =
            self.cells.iter().copied().filter(|&c| c != BLANK).collect();

        let mut count = 0;
        for (ix, &a) in tiles.iter().enumerate() {
            count += tiles[ix + 1..].iter().filter(|&&b| b < a).count() as u32;
        }
        count
    }

    /// Whether the standard [`GOAL`] is reachable from this board.
    pub fn is_solvable(&self) -> bool {
        self.inversions() % 2 == 0
    }

    /// Whether `goal` is reachable from this board. On an odd-width grid a
    /// slide never changes inversion parity, so both boards must agree on it.
    pub fn can_reach(&self, goal: &Board) -> bool {
        self.inversions() % 2 == goal.inversions() % 2
    }
}

impl TryFrom<[[u8; SIDE]; SIDE]> for Board {
    type Error = BoardError;

    fn try_from(rows: [[u8; SIDE]; SIDE]) -> Result<Self, Self::Error> {
        let mut cells = [BLANK; CELLS];
        for (ix, value) in rows.iter().flatten().enumerate() {
            cells[ix] = *value;
        }
        Board::from_cells(cells)
    }
}

impl Default for Board {
    fn default() -> Self {
        GOAL
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for line in self.cells.chunks(SIDE) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            for (j, c) in line.iter().enumerate() {
                if j > 0 {
                    f.write_char(' ')?;
                }
                f.write_char(if *c == BLANK {
                    '_'
                } else {
                    (b'0' + c) as char
                })?;
            }
        }

        Ok(())
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.cells[index.0 * SIDE + index.1]
    }
}

/// Reads a board from text.
///
/// Rows are separated by newlines or `/`. Each cell is a single digit, and
/// the blank may also be written `_` or `.`. Spaces and commas are ignored.
/// A single row of nine cells is read row-major, so `"123456780"` is the
/// standard goal.
pub fn parse_board(b: &str) -> Result<Board, BoardError> {
    let mut rows = Vec::new();
    for line in b.trim().split(|c: char| c == '\n' || c == '/') {
        let mut row = Vec::new();
        for ch in line.chars() {
            match ch {
                '0'..='9' => row.push(ch as u8 - b'0'),
                '_' | '.' => row.push(BLANK),
                ' ' | '\t' | '\r' | ',' => {}
                _ => return Err(BoardError::InvalidCharacter { ch }),
            }
        }

        if !row.is_empty() {
            rows.push(row);
        }
    }

    match rows.len() {
        0 => Err(BoardError::Empty),
        1 if rows[0].len() == CELLS => {
            Board::new(rows[0].chunks(SIDE).map(|r| r.to_vec()).collect())
        }
        _ => Board::new(rows),
    }
}
