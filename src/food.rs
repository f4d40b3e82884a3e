// Food pool: a fixed number of slots, each eaten slot refilled in place

use serde::Serialize;

use crate::board::on_living_snake;
use crate::grid::Grid;
use crate::obstacles::ObstacleField;
use crate::rng::SessionRng;
use crate::snake::Snake;
use crate::types::{Cell, FoodKind};

/// Random placement attempts per board cell before falling back to a scan
pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Food {
    pub position: Cell,
    pub kind: FoodKind,
}

impl Food {
    pub fn new(position: Cell, kind: FoodKind) -> Self {
        Food { position, kind }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FoodPool {
    slots: Vec<Food>,
}

impl FoodPool {
    pub fn from_slots(slots: Vec<Food>) -> Self {
        FoodPool { slots }
    }

    /// Fresh pool of `size` items
    pub fn generate(
        grid: &Grid,
        size: usize,
        obstacles: &ObstacleField,
        snakes: &[Snake],
        rng: &mut SessionRng,
    ) -> Self {
        let mut pool = FoodPool {
            slots: Vec::with_capacity(size),
        };
        pool.top_up(grid, size, obstacles, snakes, rng);
        pool
    }

    pub fn slots(&self) -> &[Food] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Cell> + '_ {
        self.slots.iter().map(|f| f.position)
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.slots.iter().any(|f| f.position == *cell)
    }

    /// Index of the slot holding food at `cell`
    pub fn slot_at(&self, cell: &Cell) -> Option<usize> {
        self.slots.iter().position(|f| f.position == *cell)
    }

    /// Replaces slot `index` with a freshly sampled item; slot identity is kept.
    /// Returns the item that was there.
    pub fn replace(
        &mut self,
        index: usize,
        grid: &Grid,
        obstacles: &ObstacleField,
        snakes: &[Snake],
        rng: &mut SessionRng,
    ) -> Option<Food> {
        if index >= self.slots.len() {
            return None;
        }
        let eaten = self.slots[index];
        let position = self.random_position(grid, obstacles, snakes, rng);
        self.slots[index] = Food::new(position, random_kind(rng));
        Some(eaten)
    }

    /// Appends items until the pool holds `size`; returns how many were added
    pub fn top_up(
        &mut self,
        grid: &Grid,
        size: usize,
        obstacles: &ObstacleField,
        snakes: &[Snake],
        rng: &mut SessionRng,
    ) -> usize {
        let mut added = 0;
        while self.slots.len() < size {
            let position = self.random_position(grid, obstacles, snakes, rng);
            self.slots.push(Food::new(position, random_kind(rng)));
            added += 1;
        }
        added
    }

    /// A cell free of obstacles, other food and living snakes.
    ///
    /// Rejection sampling bounded by the board area; then the first free cell in
    /// row-major order; on a full board the last sampled cell is accepted.
    pub fn random_position(
        &self,
        grid: &Grid,
        obstacles: &ObstacleField,
        snakes: &[Snake],
        rng: &mut SessionRng,
    ) -> Cell {
        let free = |cell: &Cell| {
            !obstacles.contains(cell) && !self.contains(cell) && !on_living_snake(snakes, cell)
        };

        let attempts = grid.area() * PLACEMENT_ATTEMPTS_PER_CELL;
        let mut candidate = rng.random_cell(grid);
        for _ in 0..attempts {
            if free(&candidate) {
                return candidate;
            }
            candidate = rng.random_cell(grid);
        }

        grid.cells().find(|c| free(c)).unwrap_or(candidate)
    }
}

fn random_kind(rng: &mut SessionRng) -> FoodKind {
    rng.pick(&FoodKind::all()).unwrap_or(FoodKind::Apple)
}
