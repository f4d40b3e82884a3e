// Frog agent: a single consumable that flees the nearest snake and respawns
// on a timer after being eaten.

use log::debug;
use std::time::{Duration, Instant};

use crate::board::{distance_to_nearest_snake, on_living_snake};
use crate::clock::due_to_move;
use crate::food::PLACEMENT_ATTEMPTS_PER_CELL;
use crate::grid::Grid;
use crate::obstacles::ObstacleField;
use crate::rng::SessionRng;
use crate::snake::Snake;
use crate::types::{Cell, Direction};

/// Outcome of one frog tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrogStep {
    /// Not due, or nothing to do
    Idle,
    Spawned(Cell),
    Moved { from: Cell, to: Cell },
    /// Due but boxed in
    Stayed(Cell),
}

#[derive(Debug, Clone)]
pub struct Frog {
    position: Option<Cell>,
    last_move: Instant,
    next_spawn_at: Option<Instant>,
}

impl Frog {
    /// An absent frog with no pending spawn
    pub fn new(now: Instant) -> Self {
        Frog {
            position: None,
            last_move: now,
            next_spawn_at: None,
        }
    }

    pub fn position(&self) -> Option<Cell> {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }

    pub fn next_spawn_at(&self) -> Option<Instant> {
        self.next_spawn_at
    }

    /// Places the frog on a fresh cell. Returns false (frog stays absent) when
    /// the board has no cell free of obstacles and living snakes.
    pub fn spawn(
        &mut self,
        now: Instant,
        grid: &Grid,
        obstacles: &ObstacleField,
        snakes: &[Snake],
        rng: &mut SessionRng,
    ) -> bool {
        match spawn_position(grid, obstacles, snakes, rng) {
            Some(cell) => {
                self.position = Some(cell);
                self.next_spawn_at = None;
                self.last_move = now;
                true
            }
            None => {
                debug!("No free cell for the frog, retrying later");
                false
            }
        }
    }

    /// Instant at which the frog next wants a tick, `None` when it is cleared
    pub fn next_due(&self, move_delay: Duration) -> Option<Instant> {
        match self.position {
            Some(_) => Some(self.last_move + move_delay),
            None => self.next_spawn_at,
        }
    }

    /// One frog tick: respawn when absent and the timer has elapsed, otherwise
    /// flee once per `move_delay`
    pub fn step(
        &mut self,
        now: Instant,
        move_delay: Duration,
        grid: &Grid,
        obstacles: &ObstacleField,
        snakes: &[Snake],
        rng: &mut SessionRng,
    ) -> FrogStep {
        let Some(from) = self.position else {
            return match self.next_spawn_at {
                Some(at) if at <= now => {
                    if self.spawn(now, grid, obstacles, snakes, rng) {
                        self.position.map_or(FrogStep::Idle, FrogStep::Spawned)
                    } else {
                        // try again on the next move cadence
                        self.next_spawn_at = Some(now + move_delay);
                        FrogStep::Idle
                    }
                }
                _ => FrogStep::Idle,
            };
        };

        if !due_to_move(self.last_move, move_delay, now) {
            return FrogStep::Idle;
        }
        self.last_move = now;

        match flee_target(from, grid, obstacles, snakes) {
            Some(to) => {
                self.position = Some(to);
                FrogStep::Moved { from, to }
            }
            None => FrogStep::Stayed(from),
        }
    }

    /// Removes the frog and arms the respawn timer
    pub fn eaten(&mut self, now: Instant, respawn_delay: Duration) {
        self.position = None;
        self.next_spawn_at = Some(now + respawn_delay);
    }

    /// Removes the frog with no pending respawn
    pub fn clear(&mut self, now: Instant) {
        self.position = None;
        self.next_spawn_at = None;
        self.last_move = now;
    }

    /// Test and scenario hook: put the frog on `cell`
    pub fn place(&mut self, cell: Cell, now: Instant) {
        self.position = Some(cell);
        self.next_spawn_at = None;
        self.last_move = now;
    }
}

/// Neighbour of `from` that maximises the distance to the nearest living snake
/// segment. Candidates are tried Up, Down, Left, Right; the first best wins.
pub fn flee_target(
    from: Cell,
    grid: &Grid,
    obstacles: &ObstacleField,
    snakes: &[Snake],
) -> Option<Cell> {
    let mut best: Option<(Cell, i32)> = None;
    for dir in Direction::all() {
        let candidate = dir.apply(&from);
        if !grid.in_bounds(&candidate)
            || obstacles.contains(&candidate)
            || on_living_snake(snakes, &candidate)
        {
            continue;
        }
        let distance = distance_to_nearest_snake(snakes, &candidate).unwrap_or(i32::MAX);
        match best {
            Some((_, best_distance)) if distance <= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(cell, _)| cell)
}

fn spawn_position(
    grid: &Grid,
    obstacles: &ObstacleField,
    snakes: &[Snake],
    rng: &mut SessionRng,
) -> Option<Cell> {
    let free = |cell: &Cell| !obstacles.contains(cell) && !on_living_snake(snakes, cell);

    for _ in 0..grid.area() * PLACEMENT_ATTEMPTS_PER_CELL {
        let candidate = rng.random_cell(grid);
        if free(&candidate) {
            return Some(candidate);
        }
    }
    grid.cells().find(|c| free(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn snake_at(cells: &[(i32, i32)]) -> Snake {
        Snake::new(
            Role::Player,
            cells.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
            Direction::Right,
            Instant::now(),
        )
    }

    #[test]
    fn test_flees_away_from_snake() {
        let grid = Grid::new(10, 20);
        let snakes = vec![snake_at(&[(5, 4), (5, 5), (5, 6)])];
        // Wall of snake to the left: only moving right gains distance
        let target = flee_target(Cell::new(7, 5), &grid, &ObstacleField::default(), &snakes);
        assert_eq!(target, Some(Cell::new(8, 5)));
    }

    #[test]
    fn test_flee_without_snakes_takes_first_candidate() {
        let grid = Grid::new(10, 20);
        let target = flee_target(Cell::new(7, 5), &grid, &ObstacleField::default(), &[]);
        assert_eq!(target, Some(Cell::new(7, 4)));
    }

    #[test]
    fn test_boxed_in_frog_stays() {
        let grid = Grid::new(10, 3);
        let obstacles = ObstacleField::from_cells(vec![Cell::new(1, 0), Cell::new(0, 1)]);
        let t0 = Instant::now();
        let mut frog = Frog::new(t0);
        frog.place(Cell::new(0, 0), t0);
        let mut rng = SessionRng::new(1);
        let delay = Duration::from_millis(300);
        let step = frog.step(t0 + delay, delay, &grid, &obstacles, &[], &mut rng);
        assert_eq!(step, FrogStep::Stayed(Cell::new(0, 0)));
    }

    #[test]
    fn test_respawn_waits_for_timer() {
        let grid = Grid::new(10, 20);
        let obstacles = ObstacleField::default();
        let t0 = Instant::now();
        let mut frog = Frog::new(t0);
        frog.place(Cell::new(3, 3), t0);
        let respawn = Duration::from_secs(5);
        let move_delay = Duration::from_millis(300);
        frog.eaten(t0, respawn);
        assert!(!frog.is_present());
        assert_eq!(frog.next_due(move_delay), Some(t0 + respawn));

        let mut rng = SessionRng::new(4);
        let early = frog.step(t0 + Duration::from_secs(1), move_delay, &grid, &obstacles, &[], &mut rng);
        assert_eq!(early, FrogStep::Idle);
        assert!(!frog.is_present());

        let late = frog.step(t0 + respawn, move_delay, &grid, &obstacles, &[], &mut rng);
        assert!(matches!(late, FrogStep::Spawned(_)));
        assert!(frog.is_present());
    }

    #[test]
    fn test_cleared_frog_never_respawns_on_its_own() {
        let grid = Grid::new(10, 20);
        let t0 = Instant::now();
        let mut frog = Frog::new(t0);
        frog.clear(t0);
        let mut rng = SessionRng::new(4);
        let delay = Duration::from_millis(300);
        assert_eq!(frog.next_due(delay), None);
        let step = frog.step(
            t0 + Duration::from_secs(60),
            delay,
            &grid,
            &ObstacleField::default(),
            &[],
            &mut rng,
        );
        assert_eq!(step, FrogStep::Idle);
    }

    #[test]
    fn test_spawn_avoids_snakes_and_obstacles() {
        let grid = Grid::new(10, 2);
        let obstacles = ObstacleField::from_cells(vec![Cell::new(0, 1)]);
        let snakes = vec![snake_at(&[(1, 0), (0, 0)])];
        let t0 = Instant::now();
        let mut frog = Frog::new(t0);
        let mut rng = SessionRng::new(2);
        assert!(frog.spawn(t0, &grid, &obstacles, &snakes, &mut rng));
        assert_eq!(frog.position(), Some(Cell::new(1, 1)));

        let full = ObstacleField::from_cells(vec![Cell::new(0, 1), Cell::new(1, 1)]);
        let mut other = Frog::new(t0);
        assert!(!other.spawn(t0, &grid, &full, &snakes, &mut rng));
        assert!(!other.is_present());
    }
}
