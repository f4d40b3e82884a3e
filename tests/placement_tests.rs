// Property-style checks over many seeds: AI move safety, obstacle spacing,
// food slot replacement and score ledger ordering.

use snake_arena::ai::{greedy_seek, random_safe};
use snake_arena::arena::Arena;
use snake_arena::board::BoardView;
use snake_arena::config::Config;
use snake_arena::food::FoodPool;
use snake_arena::grid::Grid;
use snake_arena::obstacles::{ObstacleField, OBSTACLE_SPACING, SNAKE_SPACING};
use snake_arena::rng::SessionRng;
use snake_arena::scores::{MemoryScoreStore, ScoreLedger};
use snake_arena::snake::Snake;
use snake_arena::types::{Cell, Direction, Level, Role, Screen};
use std::time::{Duration, Instant};

fn seeded_arena(seed: u64, now: Instant) -> Arena {
    let mut config = Config::default_hardcoded();
    config.session.seed = Some(seed);
    Arena::new(config, Box::new(MemoryScoreStore::new()), now)
}

/// A chosen direction must lead to an in-bounds, obstacle-free cell that no
/// living body will still occupy after the move
fn assert_safe_choice(snake: &Snake, dir: Direction, view: &BoardView) {
    let head = snake.head().unwrap();
    let next = dir.apply(&head);
    assert!(view.grid.in_bounds(&next), "{:?} leaves the board", dir);
    assert!(!view.obstacles.contains(&next), "{:?} hits an obstacle", dir);
    assert!(!dir.is_opposite(&snake.direction()));
    for other in view.living_snakes() {
        if other.role() == snake.role() {
            assert!(!other.blocks_next_move(&next), "{:?} bites itself", dir);
        } else {
            assert!(!other.contains(&next), "{:?} hits {}", dir, other.role().as_str());
        }
    }
}

#[test]
fn test_ai_choices_are_always_safe() {
    for seed in 0..20 {
        let t0 = Instant::now();
        let mut arena = seeded_arena(seed, t0);
        arena.start_level(Level::Hard, t0);
        let mut rng = SessionRng::new(seed);

        for step in 1..=60u32 {
            {
                let view = BoardView {
                    grid: arena.grid(),
                    obstacles: arena.obstacles(),
                    snakes: arena.snakes(),
                    food: arena.food(),
                    frog: arena.frog().position(),
                };
                for role in [Role::AiOne, Role::AiTwo] {
                    let snake = arena.snake(role);
                    if !snake.is_alive() {
                        continue;
                    }
                    if let Some(dir) = greedy_seek(snake, &view, &mut rng) {
                        assert_safe_choice(snake, dir, &view);
                    }
                    if let Some(dir) = random_safe(snake, &view, &mut rng) {
                        assert_safe_choice(snake, dir, &view);
                    }
                }
            }

            arena.tick(t0 + Duration::from_millis(60) * step);
            if arena.screen() != Screen::Game {
                break;
            }
        }
    }
}

#[test]
fn test_obstacle_spacing_holds_for_many_seeds() {
    let grid = Grid::new(26, 26);
    let now = Instant::now();
    let snakes = vec![
        Snake::new(
            Role::Player,
            vec![Cell::new(7, 6), Cell::new(6, 6), Cell::new(5, 6)],
            Direction::Right,
            now,
        ),
        Snake::new(
            Role::AiOne,
            vec![Cell::new(7, 13), Cell::new(6, 13), Cell::new(5, 13)],
            Direction::Right,
            now,
        ),
    ];

    for seed in 0..100 {
        let mut rng = SessionRng::new(seed);
        let field = ObstacleField::generate(&grid, 15, &snakes, &mut rng);
        assert!(field.len() <= 15);
        let obstacles = field.cells();
        for (i, a) in obstacles.iter().enumerate() {
            for b in &obstacles[i + 1..] {
                let close = (a.x - b.x).abs() <= OBSTACLE_SPACING.0
                    && (a.y - b.y).abs() <= OBSTACLE_SPACING.1;
                assert!(!close, "seed {}: {} too close to {}", seed, a, b);
            }
            for seg in snakes.iter().flat_map(|s| s.body().iter()) {
                let close = (a.x - seg.x).abs() <= SNAKE_SPACING.0
                    && (a.y - seg.y).abs() <= SNAKE_SPACING.1;
                assert!(!close, "seed {}: {} too close to snake at {}", seed, a, seg);
            }
        }
    }
}

#[test]
fn test_food_replacement_keeps_slot() {
    let grid = Grid::new(26, 26);
    let now = Instant::now();
    let snakes = vec![Snake::new(
        Role::Player,
        vec![Cell::new(7, 6), Cell::new(6, 6), Cell::new(5, 6)],
        Direction::Right,
        now,
    )];

    for seed in 0..50 {
        let mut rng = SessionRng::new(seed);
        let obstacles = ObstacleField::generate(&grid, 10, &snakes, &mut rng);
        let mut pool = FoodPool::generate(&grid, 3, &obstacles, &snakes, &mut rng);

        let slot = (seed % 3) as usize;
        let others: Vec<Cell> = pool
            .slots()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot)
            .map(|(_, f)| f.position)
            .collect();

        pool.replace(slot, &grid, &obstacles, &snakes, &mut rng);

        assert_eq!(pool.len(), 3);
        let fresh = pool.slots()[slot].position;
        assert!(grid.in_bounds(&fresh));
        assert!(!obstacles.contains(&fresh));
        assert!(!snakes[0].contains(&fresh));
        assert!(!others.contains(&fresh));
        // untouched slots stay put
        let kept: Vec<Cell> = pool
            .slots()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot)
            .map(|(_, f)| f.position)
            .collect();
        assert_eq!(kept, others);
    }
}

#[test]
fn test_ledger_sorted_and_capped() {
    let mut rng = SessionRng::new(77);
    let mut ledger = ScoreLedger::new(100);
    for _ in 0..250 {
        let score: u32 = rng.random_range(0..500);
        ledger.add_score(score, Level::Easy);
        assert!(ledger.len() <= 100);
        assert!(ledger
            .entries()
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
    }
    assert_eq!(ledger.len(), 100);
}
