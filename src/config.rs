//! Search configuration.

use std::time::{Duration, Instant};

use crate::error::SearchError;

/// Settings shared by every search strategy.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use slider_search::SearchConfig;
///
/// let config = SearchConfig::default()
///     .with_seed(42)
///     .with_max_generated(1_000_000)
///     .with_time_limit(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Seed for the child-order shuffle. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Skip children whose state already lies on their own path (dfs, bfs, dls, ids).
    ///
    /// Keeps the uninformed strategies finite on a finite state space. A* relies
    /// on its closed set instead and ignores this.
    pub prune_cycles: bool,

    /// Give up once more than this many nodes have been generated.
    pub max_generated: Option<usize>,

    /// Give up once a search has run this long.
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            prune_cycles: true,
            max_generated: None,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_cycle_pruning(mut self, prune_cycles: bool) -> Self {
        self.prune_cycles = prune_cycles;
        self
    }

    pub fn with_max_generated(mut self, max_generated: usize) -> Self {
        self.max_generated = Some(max_generated);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Starts the clock for one search run.
    pub(crate) fn budget(&self) -> Budget {
        Budget {
            max_generated: self.max_generated,
            time_limit: self.time_limit,
            started: Instant::now(),
        }
    }
}

/// Resource limits of a single run, checked between expansions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    max_generated: Option<usize>,
    time_limit: Option<Duration>,
    started: Instant,
}

impl Budget {
    pub(crate) fn check(&self, generated: usize) -> Result<(), SearchError> {
        if let Some(limit) = self.max_generated {
            if generated > limit {
                return Err(SearchError::NodeLimitExceeded { limit, generated });
            }
        }
        if let Some(limit) = self.time_limit {
            if self.started.elapsed() > limit {
                return Err(SearchError::TimedOut { limit, generated });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unbounded() {
        let config = SearchConfig::default();
        assert!(config.prune_cycles);
        assert!(config.budget().check(usize::MAX).is_ok());
    }

    #[test]
    fn node_budget_is_inclusive() {
        let budget = SearchConfig::default().with_max_generated(10).budget();
        assert!(budget.check(10).is_ok());
        assert_eq!(
            budget.check(11),
            Err(SearchError::NodeLimitExceeded { limit: 10, generated: 11 })
        );
    }

    #[test]
    fn zero_time_limit_expires() {
        let budget = SearchConfig::default()
            .with_time_limit(Duration::ZERO)
            .budget();
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(budget.check(1), Err(SearchError::TimedOut { .. })));
    }
}
