// Read-only view over the shared occupancy state, handed to decision functions

use crate::food::FoodPool;
use crate::grid::Grid;
use crate::obstacles::ObstacleField;
use crate::snake::Snake;
use crate::types::Cell;

/// Borrowed snapshot of everything an agent may look at while deciding.
/// Built by the arena while it holds the state lock, so it is always consistent.
pub struct BoardView<'a> {
    pub grid: &'a Grid,
    pub obstacles: &'a ObstacleField,
    pub snakes: &'a [Snake],
    pub food: &'a FoodPool,
    pub frog: Option<Cell>,
}

impl<'a> BoardView<'a> {
    pub fn living_snakes(&self) -> impl Iterator<Item = &'a Snake> + 'a {
        self.snakes.iter().filter(|s| s.is_alive())
    }

    /// Candidate targets for seekers: food slots in pool order, then the frog
    pub fn targets(&self) -> Vec<Cell> {
        let mut targets: Vec<Cell> = self.food.positions().collect();
        if let Some(frog) = self.frog {
            targets.push(frog);
        }
        targets
    }
}

/// Whether any living snake in `snakes` occupies `cell`
pub fn on_living_snake(snakes: &[Snake], cell: &Cell) -> bool {
    snakes.iter().any(|s| s.is_alive() && s.contains(cell))
}

/// Manhattan distance from `cell` to the closest living snake segment,
/// `None` when no snake is on the board
pub fn distance_to_nearest_snake(snakes: &[Snake], cell: &Cell) -> Option<i32> {
    snakes
        .iter()
        .filter(|s| s.is_alive())
        .flat_map(|s| s.body().iter())
        .map(|seg| seg.manhattan(cell))
        .min()
}
