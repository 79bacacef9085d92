//! Sliding-tile puzzle solver.
//!
//! A [`State`] is an n×n grid with one blank cell; [`Search`] looks for a
//! sequence of [`Move`]s turning a start state into a goal state using
//! depth-first, breadth-first, depth-limited, iterative-deepening or A* search.
//!
//! ```
//! use slider_search::{Search, SearchConfig, State};
//!
//! let goal = State::solved(3).unwrap();
//! let start: State = "1 2 3 / 4 _ 6 / 7 5 8".parse().unwrap();
//!
//! let mut search = Search::new(SearchConfig::default().with_seed(7));
//! let result = search.a_star(&start, &goal).unwrap();
//! assert_eq!(result.path().len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod heuristic;
pub mod node;
pub mod puzzle;
pub mod search;

pub use config::SearchConfig;
pub use error::{ConfigurationError, ParseStateError, SearchError};
pub use heuristic::{heuristic_cost, ManhattanDistance};
pub use node::SearchNode;
pub use puzzle::{Cell, Grid, Move, State};
pub use search::{DepthLimited, Search, SearchResult, Strategy};
