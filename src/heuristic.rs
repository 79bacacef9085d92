//! Manhattan-distance estimate of the number of slides left.

use std::collections::HashMap;

use crate::puzzle::Grid;

/// Sum over every tile of its row and column distance to where it sits in `goal`.
///
/// Blank and empty cells contribute nothing, as do tiles absent from `goal`.
/// Each slide moves one tile by one cell, so this never overestimates.
pub fn heuristic_cost(grid: &Grid, goal: &Grid) -> usize {
    ManhattanDistance::new(goal).estimate(grid)
}

/// Goal tile positions indexed once, for repeated estimates against the same goal.
#[derive(Debug, Clone)]
pub struct ManhattanDistance {
    targets: HashMap<u32, (usize, usize)>,
}

impl ManhattanDistance {
    pub fn new(goal: &Grid) -> Self {
        Self {
            targets: goal.tiles().collect(),
        }
    }

    pub fn estimate(&self, grid: &Grid) -> usize {
        grid.tiles()
            .filter_map(|(id, (row, col))| {
                self.targets
                    .get(&id)
                    .map(|&(target_row, target_col)| {
                        row.abs_diff(target_row) + col.abs_diff(target_col)
                    })
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::State;

    fn grid(text: &str) -> Grid {
        text.parse::<State>().unwrap().grid().clone()
    }

    #[test]
    fn solved_grid_costs_nothing() {
        let goal = grid("1 2 3 / 4 5 6 / 7 8 _");
        assert_eq!(heuristic_cost(&goal, &goal), 0);
    }

    #[test]
    fn blank_is_not_counted() {
        // Only the blank and tile 1 differ; tile 1 is one column off.
        assert_eq!(heuristic_cost(&grid("_ 1 / 2 3"), &grid("1 _ / 2 3")), 1);
    }

    #[test]
    fn sums_row_and_column_distance() {
        let goal = grid("1 2 3 / 4 5 6 / 7 8 _");
        // 8 is two rows and one column away, 1 is the mirror image.
        let scrambled = grid("8 2 3 / 4 5 6 / 7 1 _");
        assert_eq!(heuristic_cost(&scrambled, &goal), 6);
    }

    #[test]
    fn empty_cells_are_free() {
        assert_eq!(heuristic_cost(&grid(". _ / . 1"), &grid("_ . / 1 .")), 1);
    }
}
