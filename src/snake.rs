// Snake entity: body, heading, idle-until-input start and growth

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::StartConfig;
use crate::types::{Cell, Direction, Role};

/// A snake on the board. `body[0]` is the head.
///
/// The snake stays idle at its spawn until the first accepted direction input;
/// after that each `update` drops the tail and pushes a new head.
#[derive(Debug, Clone)]
pub struct Snake {
    role: Role,
    body: VecDeque<Cell>,
    direction: Direction,
    alive: bool,
    movement_started: bool,
    last_move: Instant,
    start_body: Vec<Cell>,
    start_direction: Direction,
}

impl Snake {
    pub fn new(role: Role, start_body: Vec<Cell>, start_direction: Direction, now: Instant) -> Self {
        Snake {
            role,
            body: start_body.iter().copied().collect(),
            direction: start_direction,
            alive: !start_body.is_empty(),
            movement_started: false,
            last_move: now,
            start_body,
            start_direction,
        }
    }

    pub fn from_start(role: Role, start: &StartConfig, now: Instant) -> Self {
        Self::new(role, start.cells(), start.direction, now)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn movement_started(&self) -> bool {
        self.movement_started
    }

    pub fn last_move(&self) -> Instant {
        self.last_move
    }

    /// Records that the cadence gate fired for this snake
    pub fn mark_moved(&mut self, now: Instant) {
        self.last_move = now;
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Cell> {
        self.body.back().copied()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body.contains(cell)
    }

    /// Whether `cell` hits this snake's body other than its head
    pub fn body_without_head_contains(&self, cell: &Cell) -> bool {
        self.body.iter().skip(1).any(|c| c == cell)
    }

    /// Whether `cell` hits a segment that stays put on the next move
    /// (everything except the final segment, which vacates)
    pub fn blocks_next_move(&self, cell: &Cell) -> bool {
        let keep = self.body.len().saturating_sub(1);
        self.body.iter().take(keep).any(|c| c == cell)
    }

    /// Requests a new heading. Reversal and input to a dead snake are ignored.
    /// Returns whether the request was accepted.
    pub fn move_direction(&mut self, requested: Direction) -> bool {
        if !self.alive || requested.is_opposite(&self.direction) {
            return false;
        }
        self.direction = requested;
        self.movement_started = true;
        true
    }

    /// One due tick of movement
    pub fn update(&mut self) {
        if !self.alive || !self.movement_started {
            return;
        }
        let Some(head) = self.head() else {
            return;
        };
        self.body.pop_back();
        self.body.push_front(self.direction.apply(&head));
    }

    /// Grows by one, duplicating the tail cell until the next move separates it
    pub fn add_segment(&mut self) {
        if let Some(tail) = self.tail() {
            self.body.push_back(tail);
        }
    }

    pub fn grow(&mut self, segments: u32) {
        for _ in 0..segments {
            self.add_segment();
        }
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.body.clear();
    }

    /// Back to the spawn layout, idle until the next direction input
    pub fn reset(&mut self, now: Instant) {
        self.body = self.start_body.iter().copied().collect();
        self.direction = self.start_direction;
        self.alive = !self.body.is_empty();
        self.movement_started = false;
        self.last_move = now;
    }

    /// Moves the snake onto `body` facing `direction`, ready to move. The spawn
    /// layout used by `reset` is untouched.
    pub fn set_body(&mut self, body: Vec<Cell>, direction: Direction) {
        self.alive = !body.is_empty();
        self.body = body.into_iter().collect();
        self.direction = direction;
        self.movement_started = self.alive;
    }

    /// Rendering angle for the head sprite
    pub fn angle(&self) -> u16 {
        self.direction.angle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(now: Instant) -> Snake {
        Snake::new(
            Role::Player,
            vec![Cell::new(7, 6), Cell::new(6, 6), Cell::new(5, 6)],
            Direction::Right,
            now,
        )
    }

    #[test]
    fn test_reversal_rejected() {
        let now = Instant::now();
        let mut snake = player(now);
        assert!(!snake.move_direction(Direction::Left));
        assert_eq!(snake.direction(), Direction::Right);
        assert!(!snake.movement_started());

        assert!(snake.move_direction(Direction::Up));
        assert!(!snake.move_direction(Direction::Down));
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_idle_until_first_input() {
        let now = Instant::now();
        let mut snake = player(now);
        let before: Vec<Cell> = snake.body().iter().copied().collect();
        for _ in 0..5 {
            snake.update();
        }
        let after: Vec<Cell> = snake.body().iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_moves_head_and_drops_tail() {
        let now = Instant::now();
        let mut snake = player(now);
        snake.move_direction(Direction::Right);
        snake.update();
        let body: Vec<Cell> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(8, 6), Cell::new(7, 6), Cell::new(6, 6)]);
    }

    #[test]
    fn test_add_segment_duplicates_tail() {
        let now = Instant::now();
        let mut snake = player(now);
        let tail = snake.tail();
        snake.add_segment();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), tail);
        assert_eq!(snake.body()[2], snake.body()[3]);
    }

    #[test]
    fn test_dead_snake_ignores_input() {
        let now = Instant::now();
        let mut snake = player(now);
        snake.die();
        assert!(snake.is_empty());
        assert!(!snake.move_direction(Direction::Up));
        snake.update();
        assert!(snake.is_empty());
    }

    #[test]
    fn test_reset_restores_spawn() {
        let now = Instant::now();
        let mut snake = player(now);
        snake.move_direction(Direction::Down);
        snake.update();
        snake.add_segment();
        snake.die();
        snake.reset(now);
        assert!(snake.is_alive());
        assert!(!snake.movement_started());
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.head(), Some(Cell::new(7, 6)));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_moving_into_vacating_tail_is_not_blocked() {
        let now = Instant::now();
        let snake = player(now);
        assert!(!snake.blocks_next_move(&Cell::new(5, 6)));
        assert!(snake.blocks_next_move(&Cell::new(6, 6)));
    }
}
