// Static obstacle placement

use log::debug;

use crate::grid::Grid;
use crate::rng::SessionRng;
use crate::snake::Snake;
use crate::types::Cell;

/// Obstacles must keep this far apart from each other (both axes within -> rejected)
pub const OBSTACLE_SPACING: (i32, i32) = (3, 3);
/// ... and this far from any living snake segment
pub const SNAKE_SPACING: (i32, i32) = (3, 2);
/// Sampling attempts allowed per requested obstacle
pub const ATTEMPTS_PER_OBSTACLE: usize = 100;

/// Set of obstacle cells for the current level. Regenerated wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    cells: Vec<Cell>,
}

impl ObstacleField {
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        ObstacleField { cells }
    }

    /// Rejection-samples up to `count` obstacles.
    ///
    /// A candidate is rejected when it lies within `OBSTACLE_SPACING` of a placed
    /// obstacle or within `SNAKE_SPACING` of a living snake segment. Sampling stops
    /// after `count * ATTEMPTS_PER_OBSTACLE` attempts, possibly short of `count`.
    pub fn generate(grid: &Grid, count: usize, snakes: &[Snake], rng: &mut SessionRng) -> Self {
        let mut cells: Vec<Cell> = Vec::with_capacity(count);
        let max_attempts = count * ATTEMPTS_PER_OBSTACLE;
        let mut attempts = 0;

        while cells.len() < count && attempts < max_attempts {
            attempts += 1;
            let candidate = rng.random_cell(grid);

            if cells.iter().any(|placed| within(&candidate, placed, OBSTACLE_SPACING)) {
                continue;
            }

            let near_snake = snakes
                .iter()
                .filter(|s| s.is_alive())
                .flat_map(|s| s.body().iter())
                .any(|seg| within(&candidate, seg, SNAKE_SPACING));
            if near_snake {
                continue;
            }

            cells.push(candidate);
        }

        if cells.len() < count {
            debug!(
                "Placed {} of {} obstacles after {} attempts",
                cells.len(),
                count,
                attempts
            );
        }

        ObstacleField { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

fn within(a: &Cell, b: &Cell, (max_dx, max_dy): (i32, i32)) -> bool {
    (a.x - b.x).abs() <= max_dx && (a.y - b.y).abs() <= max_dy
}
