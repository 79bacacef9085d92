//! Error types for grid construction, parsing and search.

/// A start or goal grid that cannot be built or searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ConfigurationError {
    /// Grids need at least one cell for the blank
    #[error("grid size must be at least 1")]
    ZeroSize,
    #[error("position ({row}, {col}) lies outside a {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("blank at ({row}, {col}) coincides with a tile")]
    BlankOverlapsTile { row: usize, col: usize },
    #[error("two tiles share position ({row}, {col})")]
    DuplicatePosition { row: usize, col: usize },
    /// Start and goal have different edge lengths
    #[error("start grid is {start}x{start} but goal grid is {goal}x{goal}")]
    DimensionMismatch { start: usize, goal: usize },
    /// Start and goal do not contain the same tiles and empty cells
    #[error("start and goal grids hold different tiles")]
    TileSetMismatch,
}

/// Failure of a search run.
///
/// Running out of depth in [`Search::dls`](crate::Search::dls) is not an error,
/// see [`DepthLimited`](crate::DepthLimited).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// The frontier emptied without reaching the goal
    #[error("no solution found after generating {generated} nodes")]
    NoSolution { generated: usize },
    #[error("node budget of {limit} exceeded ({generated} nodes generated)")]
    NodeLimitExceeded { limit: usize, generated: usize },
    #[error("time limit of {limit:?} exceeded ({generated} nodes generated)")]
    TimedOut {
        limit: std::time::Duration,
        generated: usize,
    },
}

impl SearchError {
    /// Number of nodes generated before the search gave up, if it ran at all.
    pub fn generated(&self) -> Option<usize> {
        match *self {
            SearchError::Configuration(_) => None,
            SearchError::NoSolution { generated }
            | SearchError::NodeLimitExceeded { generated, .. }
            | SearchError::TimedOut { generated, .. } => Some(generated),
        }
    }
}

/// Error for reading a [`State`](crate::State) from its text form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseStateError {
    #[error("grid text is empty")]
    Empty,
    /// Rows must all be as long as the grid is tall
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Accepted cells are `_` (blank), `.` (empty) and positive integers
    #[error("cell ({row}, {col}) contains invalid entry '{token}'")]
    InvalidCell {
        row: usize,
        col: usize,
        token: String,
    },
    /// Tile ids must run from 1 without gaps
    #[error("tile {missing} is missing, tile ids must be contiguous from 1")]
    NonContiguousTiles { missing: u32 },
    #[error("grid has no blank cell")]
    MissingBlank,
    #[error("grid has more than one blank cell")]
    MultipleBlanks,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
