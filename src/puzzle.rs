use rand::{seq::SliceRandom, Rng};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{ConfigurationError, ParseStateError};

/// Direction the blank travels in a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Fixed enumeration order used for successor generation.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, col)` offset applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Content of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// The cell tiles slide into. Exactly one per grid.
    Blank,
    /// Free space not occupied by any tile.
    Empty,
    Tile(u32),
}

/// An n×n board. Successors always get their own copy of the cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    board: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.board.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.board.iter().flat_map(|row| row.iter().copied())
    }

    /// Tile ids with their `(row, col)` positions, in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, (usize, usize))> + '_ {
        self.board.iter().enumerate().flat_map(|(i, row)| {
            row.iter().enumerate().filter_map(move |(j, cell)| match *cell {
                Cell::Tile(id) => Some((id, (i, j))),
                _ => None,
            })
        })
    }

    /// Sorted tile ids.
    pub fn tile_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.tiles().map(|(id, _)| id).collect();
        ids.sort_unstable();
        ids
    }

    fn checked_position(&self, row: isize, col: isize) -> Option<(usize, usize)> {
        let size = self.size as isize;
        if row >= 0 && row < size && col >= 0 && col < size {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }

    /// Copy of this grid with the blank at `blank` exchanged with `target`.
    ///
    /// # Panics
    /// Panics if `target` holds anything but a tile or an empty cell.
    fn swapped(&self, blank: (usize, usize), target: (usize, usize)) -> Grid {
        let mut board = self.board.clone();
        let moving = board[target.0][target.1];
        assert!(
            matches!(moving, Cell::Tile(_) | Cell::Empty),
            "invalid swap: blank at {:?} cannot exchange with {:?} at {:?}",
            blank,
            moving,
            target
        );
        debug_assert_eq!(board[blank.0][blank.1], Cell::Blank);

        board[blank.0][blank.1] = moving;
        board[target.0][target.1] = Cell::Blank;
        Grid {
            size: self.size,
            board,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for cell in row {
                match cell {
                    Cell::Blank => write!(f, "{:>2} ", "_")?,
                    Cell::Empty => write!(f, "{:>2} ", ".")?,
                    Cell::Tile(id) => write!(f, "{:2} ", id)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A puzzle configuration: the grid, where its blank is and the slide that produced it.
///
/// Equality and hashing look at the grid only.
#[derive(Debug, Clone)]
pub struct State {
    grid: Grid,
    blank: (usize, usize),
    move_taken: Option<Move>,
}

impl State {
    /// Builds a `size`×`size` grid with the blank at `agent_position` and tile
    /// `i + 1` at `block_positions[i]`. Uncovered cells are left empty.
    pub fn initialise(
        block_positions: &[(usize, usize)],
        agent_position: (usize, usize),
        size: usize,
    ) -> Result<Self, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::ZeroSize);
        }
        let in_bounds = |(row, col): (usize, usize)| {
            if row < size && col < size {
                Ok(())
            } else {
                Err(ConfigurationError::OutOfBounds { row, col, size })
            }
        };

        in_bounds(agent_position)?;
        let mut board = vec![vec![Cell::Empty; size]; size];
        board[agent_position.0][agent_position.1] = Cell::Blank;

        for (i, &(row, col)) in block_positions.iter().enumerate() {
            in_bounds((row, col))?;
            match board[row][col] {
                Cell::Blank => return Err(ConfigurationError::BlankOverlapsTile { row, col }),
                Cell::Tile(_) => return Err(ConfigurationError::DuplicatePosition { row, col }),
                Cell::Empty => board[row][col] = Cell::Tile(i as u32 + 1),
            }
        }

        Ok(Self {
            grid: Grid { size, board },
            blank: agent_position,
            move_taken: None,
        })
    }

    /// Tiles `1..size²` in row-major order with the blank in the bottom-right corner.
    pub fn solved(size: usize) -> Result<Self, ConfigurationError> {
        if size == 0 {
            return Err(ConfigurationError::ZeroSize);
        }
        let positions: Vec<(usize, usize)> = (0..size * size - 1)
            .map(|i| (i / size, i % size))
            .collect();
        Self::initialise(&positions, (size - 1, size - 1), size)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size
    }

    pub fn blank(&self) -> (usize, usize) {
        self.blank
    }

    /// The slide that produced this state, `None` for a root.
    pub fn move_taken(&self) -> Option<Move> {
        self.move_taken
    }

    /// The state reached by sliding the blank one cell in `movement`'s direction,
    /// or `None` if that would leave the grid.
    pub fn apply_move(&self, movement: Move) -> Option<State> {
        let (dr, dc) = movement.as_offset();
        let target = self
            .grid
            .checked_position(self.blank.0 as isize + dr, self.blank.1 as isize + dc)?;

        Some(State {
            grid: self.grid.swapped(self.blank, target),
            blank: target,
            move_taken: Some(movement),
        })
    }

    /// Every state one slide away, in [`Move::ALL`] order.
    pub fn possible_moves(&self) -> Vec<State> {
        Move::ALL
            .iter()
            .filter_map(|&movement| self.apply_move(movement))
            .collect()
    }

    /// Random walk of `moves` slides that never immediately undoes the previous one.
    /// The result is always reachable from `self`.
    pub fn scrambled<R: Rng + ?Sized>(&self, moves: usize, rng: &mut R) -> State {
        let mut state = self.clone();
        let mut last: Option<Move> = None;

        for _ in 0..moves {
            let options: Vec<State> = state
                .possible_moves()
                .into_iter()
                .filter(|next| match (last, next.move_taken) {
                    (Some(last), Some(taken)) => taken != last.opposite(),
                    _ => true,
                })
                .collect();

            match options.choose(rng) {
                Some(next) => {
                    last = next.move_taken;
                    state = next.clone();
                }
                None => break,
            }
        }

        state.move_taken = None;
        state
    }

    /// Inversion-parity check for whether `goal` can be reached at all.
    ///
    /// A single empty cell is ranked like a tile. With two or more empty cells
    /// the blank can exchange their places freely, so any parity is reachable
    /// and this returns `true`.
    pub fn parity_permits(&self, goal: &State) -> bool {
        let size = self.grid.size;
        if size != goal.grid.size || self.grid.tile_ids() != goal.grid.tile_ids() {
            return false;
        }
        if self.grid.cells().filter(|&cell| cell == Cell::Empty).count() >= 2 {
            return true;
        }

        let rank: HashMap<Cell, usize> = goal
            .grid
            .cells()
            .filter(|&cell| cell != Cell::Blank)
            .enumerate()
            .map(|(i, cell)| (cell, i))
            .collect();
        let ranked: Vec<usize> = self
            .grid
            .cells()
            .filter_map(|cell| rank.get(&cell).copied())
            .collect();
        let inversions = count_inversions(&ranked);

        if size % 2 == 1 {
            // Vertical slides jump an even number of tiles
            inversions % 2 == 0
        } else {
            (inversions + self.blank.0.abs_diff(goal.blank.0)) % 2 == 0
        }
    }
}

fn count_inversions(ranked: &[usize]) -> usize {
    ranked
        .iter()
        .enumerate()
        .map(|(i, &val)| ranked[i + 1..].iter().filter(|&&next| next < val).count())
        .sum()
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grid.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid.fmt(f)
    }
}

/// Reads grids such as `"_ 1 / 2 3"`: rows split on `/` or newlines, cells on
/// whitespace, `_` for the blank, `.` for an empty cell.
impl FromStr for State {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<&str>> = s
            .split(|c: char| c == '/' || c == '\n')
            .map(|row| row.split_whitespace().collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(ParseStateError::Empty);
        }

        let size = rows.len();
        let mut blank = None;
        let mut tiles: Vec<(u32, (usize, usize))> = Vec::new();

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != size {
                return Err(ParseStateError::RaggedRow {
                    row,
                    expected: size,
                    found: cells.len(),
                });
            }
            for (col, token) in cells.iter().enumerate() {
                match *token {
                    "_" => {
                        if blank.replace((row, col)).is_some() {
                            return Err(ParseStateError::MultipleBlanks);
                        }
                    }
                    "." => {}
                    _ => match token.parse::<u32>() {
                        Ok(id) if id > 0 => tiles.push((id, (row, col))),
                        _ => {
                            return Err(ParseStateError::InvalidCell {
                                row,
                                col,
                                token: token.to_string(),
                            })
                        }
                    },
                }
            }
        }

        let blank = blank.ok_or(ParseStateError::MissingBlank)?;
        tiles.sort_by_key(|&(id, _)| id);
        for (expected, &(id, _)) in (1..).zip(&tiles) {
            if id != expected {
                return Err(ParseStateError::NonContiguousTiles { missing: expected });
            }
        }

        let positions: Vec<(usize, usize)> = tiles.into_iter().map(|(_, pos)| pos).collect();
        Ok(State::initialise(&positions, blank, size)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn state(text: &str) -> State {
        text.parse().unwrap_or_else(|err| panic!("{}: {}", text, err))
    }

    #[test]
    fn initialise_places_tiles_in_order() {
        let s = State::initialise(&[(0, 1), (1, 0), (1, 1)], (0, 0), 2).unwrap();
        assert_eq!(s.grid().get(0, 0), Some(Cell::Blank));
        assert_eq!(s.grid().get(0, 1), Some(Cell::Tile(1)));
        assert_eq!(s.grid().get(1, 0), Some(Cell::Tile(2)));
        assert_eq!(s.grid().get(1, 1), Some(Cell::Tile(3)));
        assert_eq!(s.blank(), (0, 0));
        assert_eq!(s.move_taken(), None);
    }

    #[test]
    fn initialise_leaves_uncovered_cells_empty() {
        let s = State::initialise(&[(2, 2)], (0, 0), 3).unwrap();
        assert_eq!(s.grid().cells().filter(|&c| c == Cell::Empty).count(), 7);
    }

    #[test]
    fn initialise_rejects_bad_positions() {
        assert_eq!(
            State::initialise(&[(0, 2)], (0, 0), 2).unwrap_err(),
            ConfigurationError::OutOfBounds { row: 0, col: 2, size: 2 }
        );
        assert_eq!(
            State::initialise(&[(0, 1)], (5, 0), 2).unwrap_err(),
            ConfigurationError::OutOfBounds { row: 5, col: 0, size: 2 }
        );
        assert_eq!(
            State::initialise(&[(0, 1), (0, 0)], (0, 0), 2).unwrap_err(),
            ConfigurationError::BlankOverlapsTile { row: 0, col: 0 }
        );
        assert_eq!(
            State::initialise(&[(0, 1), (0, 1)], (0, 0), 2).unwrap_err(),
            ConfigurationError::DuplicatePosition { row: 0, col: 1 }
        );
        assert_eq!(
            State::initialise(&[], (0, 0), 0).unwrap_err(),
            ConfigurationError::ZeroSize
        );
    }

    #[test]
    fn solved_grid_has_blank_last() {
        let s = State::solved(3).unwrap();
        assert_eq!(s, state("1 2 3 / 4 5 6 / 7 8 _"));
        assert_eq!(s.blank(), (2, 2));
    }

    #[test]
    fn corner_blank_has_two_successors() {
        let s = state("_ 1 / 2 3");
        let moves: Vec<Move> = s
            .possible_moves()
            .iter()
            .filter_map(State::move_taken)
            .collect();
        assert_eq!(moves, vec![Move::Down, Move::Right]);
    }

    #[test]
    fn centre_blank_has_four_successors() {
        let s = state("1 2 3 / 4 _ 5 / 6 7 8");
        let successors = s.possible_moves();
        assert_eq!(successors.len(), 4);
        assert_eq!(successors[0], state("1 _ 3 / 4 2 5 / 6 7 8"));
        assert_eq!(successors[0].blank(), (0, 1));
    }

    #[test]
    fn successors_do_not_share_storage() {
        let s = state("1 2 3 / 4 _ 5 / 6 7 8");
        let successors = s.possible_moves();
        assert_eq!(s, state("1 2 3 / 4 _ 5 / 6 7 8"));
        for (i, a) in successors.iter().enumerate() {
            for b in &successors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn blank_slides_into_empty_cells() {
        let s = state("_ . / . 1");
        let right = s.apply_move(Move::Right).unwrap();
        assert_eq!(right, state(". _ / . 1"));
        assert!(s.apply_move(Move::Up).is_none());
    }

    #[test]
    #[should_panic(expected = "invalid swap")]
    fn swapping_with_blank_is_fatal() {
        let grid = state("_ 1 / 2 3").grid().clone();
        grid.swapped((0, 0), (0, 0));
    }

    #[test]
    fn equality_ignores_move_label() {
        let s = state("1 _ / 2 3");
        let via_move = state("_ 1 / 2 3").apply_move(Move::Right).unwrap();
        assert_eq!(via_move.move_taken(), Some(Move::Right));
        assert_eq!(s, via_move);
    }

    #[test]
    fn scrambled_state_stays_reachable() {
        let goal = State::solved(3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for moves in 0..30 {
            let start = goal.scrambled(moves, &mut rng);
            assert!(start.parity_permits(&goal));
            assert_eq!(start.move_taken(), None);
        }
    }

    #[test]
    fn parity_rejects_swapped_tiles() {
        assert!(!state("_ 2 / 1 3").parity_permits(&state("_ 1 / 2 3")));
        assert!(state("1 _ / 2 3").parity_permits(&state("_ 1 / 2 3")));
        assert!(!state("2 1 3 / 4 5 6 / 7 8 _").parity_permits(&State::solved(3).unwrap()));
    }

    #[test]
    fn single_empty_cell_keeps_parity() {
        assert!(!state("_ . / 1 2").parity_permits(&state("_ . / 2 1")));
        assert!(state(". _ / 1 2").parity_permits(&state("_ . / 1 2")));
        assert!(!state("1 2 3 / 4 5 6 / 7 . _").parity_permits(&state("2 1 3 / 4 5 6 / 7 . _")));
        assert!(state("1 2 3 / 4 5 6 / 7 . _").parity_permits(&state("1 2 3 / 4 5 _ / 7 . 6")));
    }

    #[test]
    fn several_empty_cells_lift_parity() {
        assert!(state("_ . / . 1").parity_permits(&state("_ 1 / . .")));
        assert!(state("_ . . / 1 2 3 / 4 5 6").parity_permits(&state("_ . . / 2 1 3 / 4 5 6")));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert_eq!("".parse::<State>().unwrap_err(), ParseStateError::Empty);
        assert_eq!(
            "_ 1 / 2".parse::<State>().unwrap_err(),
            ParseStateError::RaggedRow { row: 1, expected: 2, found: 1 }
        );
        assert_eq!(
            "1 2 / 3 .".parse::<State>().unwrap_err(),
            ParseStateError::MissingBlank
        );
        assert_eq!(
            "_ _ / 1 2".parse::<State>().unwrap_err(),
            ParseStateError::MultipleBlanks
        );
        assert_eq!(
            "_ 1 / 3 x".parse::<State>().unwrap_err(),
            ParseStateError::InvalidCell { row: 1, col: 1, token: "x".to_string() }
        );
        assert_eq!(
            "_ 1 / 3 .".parse::<State>().unwrap_err(),
            ParseStateError::NonContiguousTiles { missing: 2 }
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let s = state("4 . 1 / 2 _ 3 / . 5 .");
        assert_eq!(s.to_string().parse::<State>().unwrap(), s);
    }
}
