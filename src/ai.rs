// AI decision functions
//
// Each AI snake asks its strategy for a heading once per due tick. Strategies are
// plain functions looked up by role and configured kind; the player has none.

use log::debug;

use crate::board::BoardView;
use crate::config::AiStrategyKind;
use crate::rng::SessionRng;
use crate::snake::Snake;
use crate::types::{Cell, Direction, Role};

/// A decision function: `None` means "keep the current heading"
pub type DecisionFn = fn(&Snake, &BoardView, &mut SessionRng) -> Option<Direction>;

/// Strategy table keyed by role
pub fn strategy_for(role: Role, kind: AiStrategyKind) -> Option<DecisionFn> {
    if !role.is_ai() {
        return None;
    }
    match kind {
        AiStrategyKind::Greedy => Some(greedy_seek as DecisionFn),
        AiStrategyKind::Wander => Some(random_safe as DecisionFn),
    }
}

/// Greedy target seeking.
///
/// Picks the globally nearest target (food or frog, Manhattan distance from the
/// head, first listed wins ties), then among the safe non-reversing directions
/// in order Up, Down, Left, Right returns the first that minimises the distance
/// to that target. With no targets on the board the first safe direction wins.
pub fn greedy_seek(snake: &Snake, view: &BoardView, _rng: &mut SessionRng) -> Option<Direction> {
    let head = snake.head()?;
    let target = nearest_target(head, &view.targets());

    let mut best: Option<(Direction, i32)> = None;
    for dir in safe_directions(snake, view) {
        let next = dir.apply(&head);
        let distance = target.map(|t| next.manhattan(&t)).unwrap_or(0);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((dir, distance)),
        }
    }

    if best.is_none() {
        debug!("{} has no safe move from {}", snake.role().as_str(), head);
    }
    best.map(|(dir, _)| dir)
}

/// Uniformly random safe, non-reversing direction
pub fn random_safe(snake: &Snake, view: &BoardView, rng: &mut SessionRng) -> Option<Direction> {
    let options: Vec<Direction> = safe_directions(snake, view).collect();
    rng.pick(&options)
}

/// Safe directions in decision order, excluding the reversal
pub fn safe_directions<'a>(
    snake: &'a Snake,
    view: &'a BoardView<'a>,
) -> impl Iterator<Item = Direction> + 'a {
    let head = snake.head();
    let current = snake.direction();
    Direction::all()
        .into_iter()
        .filter(move |dir| !dir.is_opposite(&current))
        .filter(move |dir| match head {
            Some(h) => is_safe_cell(snake, &dir.apply(&h), view),
            None => false,
        })
}

/// Whether `snake` could enter `cell` on its next move without colliding:
/// in bounds, no obstacle, no living foreign body, and none of its own body
/// except the tail, which vacates
pub fn is_safe_cell(snake: &Snake, cell: &Cell, view: &BoardView) -> bool {
    if !view.grid.in_bounds(cell) {
        return false;
    }
    if view.obstacles.contains(cell) {
        return false;
    }
    if snake.blocks_next_move(cell) {
        return false;
    }
    !view
        .living_snakes()
        .filter(|other| other.role() != snake.role())
        .any(|other| other.contains(cell))
}

/// Closest target to `from`; earlier entries win ties
pub fn nearest_target(from: Cell, targets: &[Cell]) -> Option<Cell> {
    let mut best: Option<(Cell, i32)> = None;
    for target in targets {
        let d = from.manhattan(target);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((*target, d)),
        }
    }
    best.map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::{Food, FoodPool};
    use crate::grid::Grid;
    use crate::obstacles::ObstacleField;
    use crate::types::FoodKind;
    use std::time::Instant;

    fn snake(role: Role, cells: &[(i32, i32)], dir: Direction) -> Snake {
        let mut s = Snake::new(
            role,
            cells.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
            dir,
            Instant::now(),
        );
        s.move_direction(dir);
        s
    }

    #[test]
    fn test_nearest_target_first_wins_ties() {
        let from = Cell::new(5, 5);
        let targets = [Cell::new(7, 5), Cell::new(5, 3), Cell::new(9, 9)];
        assert_eq!(nearest_target(from, &targets), Some(Cell::new(7, 5)));
        assert_eq!(nearest_target(from, &[]), None);
    }

    #[test]
    fn test_greedy_heads_for_food() {
        let grid = Grid::new(10, 20);
        let obstacles = ObstacleField::default();
        let food = FoodPool::from_slots(vec![Food::new(Cell::new(10, 2), FoodKind::Apple)]);
        let snakes = vec![
            snake(Role::Player, &[(18, 18), (17, 18), (16, 18)], Direction::Right),
            snake(Role::AiOne, &[(10, 6), (9, 6), (8, 6)], Direction::Right),
        ];
        let view = BoardView {
            grid: &grid,
            obstacles: &obstacles,
            snakes: &snakes,
            food: &food,
            frog: None,
        };
        let mut rng = SessionRng::new(1);
        assert_eq!(greedy_seek(&snakes[1], &view, &mut rng), Some(Direction::Up));
    }

    #[test]
    fn test_greedy_prefers_closer_frog() {
        let grid = Grid::new(10, 20);
        let obstacles = ObstacleField::default();
        let food = FoodPool::from_slots(vec![Food::new(Cell::new(0, 19), FoodKind::Pear)]);
        let snakes = vec![snake(Role::AiOne, &[(10, 10), (9, 10), (8, 10)], Direction::Right)];
        let view = BoardView {
            grid: &grid,
            obstacles: &obstacles,
            snakes: &snakes,
            food: &food,
            frog: Some(Cell::new(10, 13)),
        };
        let mut rng = SessionRng::new(1);
        assert_eq!(greedy_seek(&snakes[0], &view, &mut rng), Some(Direction::Down));
    }

    #[test]
    fn test_boxed_in_returns_none() {
        let grid = Grid::new(10, 20);
        let obstacles =
            ObstacleField::from_cells(vec![Cell::new(0, 1), Cell::new(1, 0)]);
        let food = FoodPool::from_slots(vec![]);
        // Head in the corner facing up; right is (1,0) obstacle, down (0,1) obstacle, up/left off board
        let snakes = vec![snake(Role::AiTwo, &[(0, 0), (0, 1)], Direction::Up)];
        let view = BoardView {
            grid: &grid,
            obstacles: &obstacles,
            snakes: &snakes,
            food: &food,
            frog: None,
        };
        let mut rng = SessionRng::new(1);
        assert_eq!(greedy_seek(&snakes[0], &view, &mut rng), None);
        assert_eq!(random_safe(&snakes[0], &view, &mut rng), None);
    }

    #[test]
    fn test_dead_rival_does_not_block() {
        let grid = Grid::new(10, 20);
        let obstacles = ObstacleField::default();
        let food = FoodPool::from_slots(vec![]);
        let mut rival = snake(Role::AiTwo, &[(6, 5), (6, 4), (6, 3)], Direction::Down);
        let me = snake(Role::AiOne, &[(5, 5), (4, 5), (3, 5)], Direction::Right);
        {
            let snakes = vec![me.clone(), rival.clone()];
            let view = BoardView {
                grid: &grid,
                obstacles: &obstacles,
                snakes: &snakes,
                food: &food,
                frog: None,
            };
            assert!(!is_safe_cell(&me, &Cell::new(6, 5), &view));
        }
        rival.die();
        let snakes = vec![me.clone(), rival];
        let view = BoardView {
            grid: &grid,
            obstacles: &obstacles,
            snakes: &snakes,
            food: &food,
            frog: None,
        };
        assert!(is_safe_cell(&me, &Cell::new(6, 5), &view));
    }

    #[test]
    fn test_player_has_no_strategy() {
        assert!(strategy_for(Role::Player, AiStrategyKind::Greedy).is_none());
        assert!(strategy_for(Role::AiOne, AiStrategyKind::Greedy).is_some());
        assert!(strategy_for(Role::AiTwo, AiStrategyKind::Wander).is_some());
    }
}
