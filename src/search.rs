//! The five search strategies over sliding-puzzle states.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, trace};

use crate::config::{Budget, SearchConfig};
use crate::error::{ConfigurationError, SearchError};
use crate::heuristic::ManhattanDistance;
use crate::node::SearchNode;
use crate::puzzle::{Grid, Move, State};

/// Node that matched the goal, with the number of nodes generated to get there
/// (root included).
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub node: Rc<SearchNode>,
    pub generated: usize,
}

impl SearchResult {
    pub fn path(&self) -> Vec<Move> {
        self.node.path()
    }
}

/// Outcome of a depth-bounded search.
#[derive(Debug, Clone)]
pub enum DepthLimited {
    Found(SearchResult),
    /// Every node within the bound was examined without reaching the goal.
    Cutoff { generated: usize },
}

impl DepthLimited {
    pub fn generated(&self) -> usize {
        match self {
            DepthLimited::Found(result) => result.generated,
            DepthLimited::Cutoff { generated } => *generated,
        }
    }

    pub fn found(self) -> Option<SearchResult> {
        match self {
            DepthLimited::Found(result) => Some(result),
            DepthLimited::Cutoff { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    DepthLimited,
    IterativeDeepening,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::DepthLimited,
        Strategy::IterativeDeepening,
        Strategy::AStar,
    ];

    /// Whether the strategy takes a depth bound.
    pub fn is_bounded(&self) -> bool {
        matches!(self, Strategy::DepthLimited | Strategy::IterativeDeepening)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Strategy::DepthFirst => "dfs",
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthLimited => "dls",
            Strategy::IterativeDeepening => "ids",
            Strategy::AStar => "astar",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dfs" => Ok(Strategy::DepthFirst),
            "bfs" => Ok(Strategy::BreadthFirst),
            "dls" => Ok(Strategy::DepthLimited),
            "ids" => Ok(Strategy::IterativeDeepening),
            "astar" | "a*" | "a-star" => Ok(Strategy::AStar),
            other => Err(format!(
                "unknown strategy '{}', expected one of dfs, bfs, dls, ids, astar",
                other
            )),
        }
    }
}

/// Runs searches from a start state to a goal state.
///
/// Every expansion shuffles its children with the owned random source, so
/// seed it (or inject one with [`Search::with_rng`]) for reproducible runs.
///
/// ```
/// use slider_search::{Move, Search, SearchConfig, State};
///
/// let start: State = "_ 1 / 2 3".parse().unwrap();
/// let goal: State = "1 _ / 2 3".parse().unwrap();
///
/// let mut search = Search::new(SearchConfig::default().with_seed(1));
/// let result = search.bfs(&start, &goal).unwrap();
/// assert_eq!(result.path(), vec![Move::Right]);
/// ```
pub struct Search<R = StdRng> {
    config: SearchConfig,
    rng: R,
}

impl Search<StdRng> {
    pub fn new(config: SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }
}

impl<R: Rng> Search<R> {
    /// Uses `rng` for child ordering; `config.seed` is ignored.
    pub fn with_rng(config: SearchConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Dispatches to the chosen strategy. `depth` is only read by dls and ids.
    pub fn run(
        &mut self,
        strategy: Strategy,
        start: &State,
        goal: &State,
        depth: usize,
    ) -> Result<DepthLimited, SearchError> {
        match strategy {
            Strategy::DepthFirst => self.dfs(start, goal).map(DepthLimited::Found),
            Strategy::BreadthFirst => self.bfs(start, goal).map(DepthLimited::Found),
            Strategy::DepthLimited => self.dls(start, goal, depth),
            Strategy::IterativeDeepening => self.ids(start, goal, depth).map(DepthLimited::Found),
            Strategy::AStar => self.a_star(start, goal).map(DepthLimited::Found),
        }
    }

    /// Depth-first search with a LIFO frontier and no depth bound.
    ///
    /// With the default [`SearchConfig`] a child whose state already lies on its
    /// own path is not generated, so the search ends on a finite state space.
    /// [`SearchConfig::with_cycle_pruning`]`(false)` drops that check and may loop forever.
    pub fn dfs(&mut self, start: &State, goal: &State) -> Result<SearchResult, SearchError> {
        check_compatible(start, goal)?;
        let budget = self.config.budget();
        let mut generated = 1;
        let mut stack = vec![Rc::new(SearchNode::root(start.clone()))];

        while let Some(node) = stack.pop() {
            if node.is_goal(goal) {
                debug!(strategy = "dfs", generated, moves = node.depth(), "goal reached");
                return Ok(SearchResult { node, generated });
            }

            for child in self.expand(&node) {
                generated += 1;
                stack.push(Rc::new(child));
            }
            budget.check(generated)?;
        }

        debug!(strategy = "dfs", generated, "frontier exhausted");
        Err(SearchError::NoSolution { generated })
    }

    /// Breadth-first search; the returned path has the fewest possible moves.
    ///
    /// Skips ancestor revisits by default like [`dfs`](Self::dfs);
    /// [`SearchConfig::with_cycle_pruning`]`(false)` restores the unpruned frontier.
    pub fn bfs(&mut self, start: &State, goal: &State) -> Result<SearchResult, SearchError> {
        check_compatible(start, goal)?;
        let budget = self.config.budget();
        let mut generated = 1;
        let mut queue = VecDeque::new();
        queue.push_back(Rc::new(SearchNode::root(start.clone())));

        while let Some(node) = queue.pop_front() {
            if node.is_goal(goal) {
                debug!(strategy = "bfs", generated, moves = node.depth(), "goal reached");
                return Ok(SearchResult { node, generated });
            }

            for child in self.expand(&node) {
                generated += 1;
                queue.push_back(Rc::new(child));
            }
            budget.check(generated)?;
        }

        debug!(strategy = "bfs", generated, "frontier exhausted");
        Err(SearchError::NoSolution { generated })
    }

    /// Depth-first search that never expands nodes at `max_depth`.
    ///
    /// Running out of nodes within the bound is the normal
    /// [`DepthLimited::Cutoff`] outcome; only configuration problems and
    /// exhausted budgets are errors.
    pub fn dls(
        &mut self,
        start: &State,
        goal: &State,
        max_depth: usize,
    ) -> Result<DepthLimited, SearchError> {
        check_compatible(start, goal)?;
        let budget = self.config.budget();
        self.depth_limited(start, goal, max_depth, &budget, 0)
    }

    /// Runs [`dls`](Self::dls) with bounds `0..=depth_limit` until one succeeds.
    /// The generated count covers every attempt.
    pub fn ids(
        &mut self,
        start: &State,
        goal: &State,
        depth_limit: usize,
    ) -> Result<SearchResult, SearchError> {
        check_compatible(start, goal)?;
        let budget = self.config.budget();
        let mut generated = 0;

        for bound in 0..=depth_limit {
            match self.depth_limited(start, goal, bound, &budget, generated)? {
                DepthLimited::Found(result) => {
                    let generated = generated + result.generated;
                    debug!(strategy = "ids", bound, generated, "goal reached");
                    return Ok(SearchResult {
                        node: result.node,
                        generated,
                    });
                }
                DepthLimited::Cutoff { generated: spent } => {
                    generated += spent;
                    debug!(strategy = "ids", bound, generated, "depth bound exhausted");
                }
            }
        }

        Err(SearchError::NoSolution { generated })
    }

    /// A* ordered by `f = g + h` with the Manhattan-distance heuristic.
    ///
    /// Ties go to the lower `g`, then to the node queued first. A state that
    /// has been closed is never reopened, even if a cheaper path to it turns up.
    pub fn a_star(&mut self, start: &State, goal: &State) -> Result<SearchResult, SearchError> {
        check_compatible(start, goal)?;
        let budget = self.config.budget();
        let heuristic = ManhattanDistance::new(goal.grid());
        let mut generated = 1;
        let mut seq = 0;

        let mut open = BinaryHeap::new();
        let mut open_costs: HashMap<Grid, usize> = HashMap::new();
        let mut closed: HashSet<Grid> = HashSet::new();

        let root = SearchNode::root(start.clone()).with_estimate(heuristic.estimate(start.grid()));
        open_costs.insert(start.grid().clone(), 0);
        open.push(OpenEntry::new(Rc::new(root), seq));

        while let Some(OpenEntry { node, .. }) = open.pop() {
            // Superseded by a cheaper entry for the same state.
            if closed.contains(node.state().grid()) {
                continue;
            }
            if node.is_goal(goal) {
                debug!(strategy = "a_star", generated, moves = node.g(), "goal reached");
                return Ok(SearchResult { node, generated });
            }

            open_costs.remove(node.state().grid());
            closed.insert(node.state().grid().clone());

            for child in node.generate_children(&mut self.rng) {
                generated += 1;
                let grid = child.state().grid();
                if closed.contains(grid) {
                    continue;
                }
                if matches!(open_costs.get(grid), Some(&g) if g <= child.g()) {
                    continue;
                }

                let h = heuristic.estimate(grid);
                let child = child.with_estimate(h);
                open_costs.insert(child.state().grid().clone(), child.g());
                seq += 1;
                open.push(OpenEntry::new(Rc::new(child), seq));
            }
            trace!(open = open_costs.len(), closed = closed.len(), "expanded node");
            budget.check(generated)?;
        }

        debug!(strategy = "a_star", generated, "open set exhausted");
        Err(SearchError::NoSolution { generated })
    }

    /// `spent` is what earlier attempts already generated, for the budget.
    fn depth_limited(
        &mut self,
        start: &State,
        goal: &State,
        max_depth: usize,
        budget: &Budget,
        spent: usize,
    ) -> Result<DepthLimited, SearchError> {
        let mut generated = 1;
        let mut stack = vec![Rc::new(SearchNode::root(start.clone()))];

        while let Some(node) = stack.pop() {
            if node.is_goal(goal) {
                debug!(strategy = "dls", max_depth, generated, "goal reached");
                return Ok(DepthLimited::Found(SearchResult { node, generated }));
            }
            if node.depth() >= max_depth {
                continue;
            }

            for child in self.expand(&node) {
                generated += 1;
                stack.push(Rc::new(child));
            }
            budget.check(spent + generated)?;
        }

        Ok(DepthLimited::Cutoff { generated })
    }

    fn expand(&mut self, node: &Rc<SearchNode>) -> Vec<SearchNode> {
        let mut children = node.generate_children(&mut self.rng);
        if self.config.prune_cycles {
            children.retain(|child| !child.revisits_ancestor());
        }
        trace!(depth = node.depth(), children = children.len(), "expanded node");
        children
    }
}

fn check_compatible(start: &State, goal: &State) -> Result<(), ConfigurationError> {
    if start.size() != goal.size() {
        return Err(ConfigurationError::DimensionMismatch {
            start: start.size(),
            goal: goal.size(),
        });
    }
    if start.grid().tile_ids() != goal.grid().tile_ids() {
        return Err(ConfigurationError::TileSetMismatch);
    }
    Ok(())
}

/// Open-set entry; the heap yields the lowest `(f, g, seq)` first.
struct OpenEntry {
    f: usize,
    g: usize,
    seq: usize,
    node: Rc<SearchNode>,
}

impl OpenEntry {
    fn new(node: Rc<SearchNode>, seq: usize) -> Self {
        Self {
            f: node.f(),
            g: node.g(),
            seq,
            node,
        }
    }

    fn key(&self) -> (usize, usize, usize) {
        (self.f, self.g, self.seq)
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}
