// The arena: single owner of all game state and the screen state machine.
//
// Every mutation goes through `&mut Arena`, so a caller holding the arena's lock
// sees each agent step (move, collision pass, side effects) as one atomic unit.

use log::{debug, info, warn};
use std::time::Instant;

use crate::ai::strategy_for;
use crate::board::BoardView;
use crate::clock::{due_to_move, Agent, Scheduler};
use crate::collision::CollisionResolver;
use crate::config::Config;
use crate::events::ArenaEvent;
use crate::food::FoodPool;
use crate::frog::{Frog, FrogStep};
use crate::grid::Grid;
use crate::obstacles::ObstacleField;
use crate::rng::SessionRng;
use crate::scores::{load_ledger, JsonFileScoreStore, ScoreLedger, ScoreStore};
use crate::snake::Snake;
use crate::snapshot::{ArenaSnapshot, ScorePage};
use crate::types::{DeathCause, Direction, Level, Role, Screen};

/// Main menu entries, by index
const MENU_EASY: usize = 0;
const MENU_MEDIUM: usize = 1;
const MENU_HARD: usize = 2;
const MENU_MULTIPLAYER: usize = 3;
const MENU_SCORE_BOARD: usize = 4;

/// Multiplayer menu entries; listed but not playable
const MULTIPLAYER_MODES: [&str; 3] = ["player vs player", "player vs ai", "ai vs ai"];

pub struct Arena {
    config: Config,
    grid: Grid,
    /// Indexed by `Role::index`
    snakes: Vec<Snake>,
    obstacles: ObstacleField,
    food: FoodPool,
    frog: Frog,
    score: u32,
    ledger: ScoreLedger,
    store: Box<dyn ScoreStore>,
    screen: Screen,
    level: Level,
    rng: SessionRng,
    food_last: Instant,
    events: Vec<ArenaEvent>,
}

impl Arena {
    pub fn new(config: Config, store: Box<dyn ScoreStore>, now: Instant) -> Self {
        let grid = config.grid.grid();
        let mut rng = SessionRng::from_seed_or_random(config.session.seed);
        let snakes = vec![
            Snake::from_start(Role::Player, &config.spawn.player, now),
            Snake::from_start(Role::AiOne, &config.spawn.ai_one, now),
            Snake::from_start(Role::AiTwo, &config.spawn.ai_two, now),
        ];
        let level = Level::default();
        let obstacles = ObstacleField::generate(
            &grid,
            config.levels.for_level(level).obstacle_count,
            &snakes,
            &mut rng,
        );
        let food = FoodPool::generate(&grid, config.food.pool_size, &obstacles, &snakes, &mut rng);
        let ledger = load_ledger(store.as_ref(), config.scores.max_entries);

        info!(
            "Arena ready: {}x{} cells, seed {}, {} stored scores",
            grid.cell_count(),
            grid.cell_count(),
            rng.seed(),
            ledger.len()
        );

        Arena {
            grid,
            snakes,
            obstacles,
            food,
            frog: Frog::new(now),
            score: 0,
            ledger,
            store,
            screen: Screen::Menu,
            level,
            rng,
            food_last: now,
            events: Vec::new(),
            config,
        }
    }

    /// Arena persisting scores to the configured JSON file
    pub fn with_file_store(config: Config, now: Instant) -> Self {
        let store = JsonFileScoreStore::new(&config.scores.store_path);
        Self::new(config, Box::new(store), now)
    }

    // ---- state machine ----

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Menu selection on the current screen. Returns whether anything changed.
    pub fn select_menu_option(&mut self, index: usize, now: Instant) -> bool {
        match (self.screen, index) {
            (Screen::Menu, MENU_EASY) => self.start_level(Level::Easy, now),
            (Screen::Menu, MENU_MEDIUM) => self.start_level(Level::Medium, now),
            (Screen::Menu, MENU_HARD) => self.start_level(Level::Hard, now),
            (Screen::Menu, MENU_MULTIPLAYER) => self.set_screen(Screen::MultiplayerMenu),
            (Screen::Menu, MENU_SCORE_BOARD) => self.set_screen(Screen::ScoreBoard),
            (Screen::MultiplayerMenu, i) if i < MULTIPLAYER_MODES.len() => {
                info!("Multiplayer mode '{}' is not available", MULTIPLAYER_MODES[i]);
                return false;
            }
            _ => {
                debug!("Ignoring menu option {} on {:?}", index, self.screen);
                return false;
            }
        }
        true
    }

    pub fn request_scoreboard(&mut self) -> bool {
        if self.screen != Screen::Menu {
            return false;
        }
        self.set_screen(Screen::ScoreBoard);
        true
    }

    pub fn request_back_to_menu(&mut self) -> bool {
        match self.screen {
            Screen::ScoreBoard | Screen::MultiplayerMenu => {
                self.set_screen(Screen::Menu);
                true
            }
            _ => false,
        }
    }

    /// Ends the running session as if the player had died
    pub fn request_reset(&mut self, now: Instant) -> bool {
        if self.screen != Screen::Game {
            return false;
        }
        self.full_reset(DeathCause::Requested, now);
        true
    }

    /// Player steering; ignored outside a game and for reversals
    pub fn on_direction_input(&mut self, direction: Direction) -> bool {
        if self.screen != Screen::Game {
            return false;
        }
        self.snakes[Role::Player.index()].move_direction(direction)
    }

    fn set_screen(&mut self, to: Screen) {
        let from = self.screen;
        if from == to {
            return;
        }
        info!("Screen {:?} -> {:?}", from, to);
        self.screen = to;
        self.events.push(ArenaEvent::ScreenChanged { from, to });
    }

    /// Fresh board for `level` and switch to the game screen
    pub fn start_level(&mut self, level: Level, now: Instant) {
        self.level = level;
        self.respawn_board(now);

        if self.frog.spawn(now, &self.grid, &self.obstacles, &self.snakes, &mut self.rng) {
            if let Some(at) = self.frog.position() {
                self.events.push(ArenaEvent::FrogSpawned { at });
            }
        }

        info!(
            "Starting level {} with {} obstacles",
            level.as_str(),
            self.obstacles.len()
        );
        self.events.push(ArenaEvent::LevelStarted {
            level,
            obstacles: self.obstacles.len(),
        });
        self.set_screen(Screen::Game);
    }

    /// Session end: record the score, reset every entity, back to the menu
    fn full_reset(&mut self, cause: DeathCause, now: Instant) {
        let score = self.score;
        let level = self.level;
        info!(
            "Session over ({}): score {} on {}",
            cause.as_str(),
            score,
            level.as_str()
        );

        self.ledger.add_score(score, level);
        if let Err(e) = self.store.save(self.ledger.entries()) {
            warn!("Failed to save scores: {}", e);
        }

        self.respawn_board(now);
        self.events.push(ArenaEvent::SessionReset {
            cause,
            score,
            level,
        });
        self.set_screen(Screen::Menu);
    }

    /// Snakes back to spawn, obstacles and food regenerated, frog cleared, score zeroed
    fn respawn_board(&mut self, now: Instant) {
        for snake in self.snakes.iter_mut() {
            snake.reset(now);
        }
        let count = self.config.levels.for_level(self.level).obstacle_count;
        self.obstacles = ObstacleField::generate(&self.grid, count, &self.snakes, &mut self.rng);
        self.food = FoodPool::generate(
            &self.grid,
            self.config.food.pool_size,
            &self.obstacles,
            &self.snakes,
            &mut self.rng,
        );
        self.frog.clear(now);
        self.food_last = now;
        self.score = 0;
    }

    // ---- simulation ----

    /// One independent agent's due tick: cadence gate, move, full collision pass.
    /// No-op outside the game screen. Returns whether the agent acted.
    pub fn step_agent(&mut self, agent: Agent, now: Instant) -> bool {
        if self.screen != Screen::Game {
            return false;
        }
        match agent {
            Agent::Player | Agent::AiOne | Agent::AiTwo => match agent.role() {
                Some(role) => self.step_snake(role, now),
                None => false,
            },
            Agent::FoodPool => self.step_food(now),
            Agent::Frog => self.step_frog(now),
        }
    }

    fn step_snake(&mut self, role: Role, now: Instant) -> bool {
        let idx = role.index();
        let delay = self.snake_delay(role);
        let snake = &self.snakes[idx];
        if !snake.is_alive() || !due_to_move(snake.last_move(), delay, now) {
            return false;
        }
        self.snakes[idx].mark_moved(now);

        if let Some(decide) = strategy_for(role, self.config.ai.strategy) {
            let choice = {
                let view = BoardView {
                    grid: &self.grid,
                    obstacles: &self.obstacles,
                    snakes: &self.snakes,
                    food: &self.food,
                    frog: self.frog.position(),
                };
                decide(&self.snakes[idx], &view, &mut self.rng)
            };
            // no safe move: carry on straight
            let heading = choice.unwrap_or_else(|| self.snakes[idx].direction());
            self.snakes[idx].move_direction(heading);
        }

        self.snakes[idx].update();
        self.resolve(now);
        true
    }

    fn step_food(&mut self, now: Instant) -> bool {
        if !due_to_move(self.food_last, self.config.timing.food_refill(), now) {
            return false;
        }
        self.food_last = now;
        let added = self.food.top_up(
            &self.grid,
            self.config.food.pool_size,
            &self.obstacles,
            &self.snakes,
            &mut self.rng,
        );
        if added > 0 {
            debug!("Food pool topped up by {}", added);
        }
        self.resolve(now);
        true
    }

    fn step_frog(&mut self, now: Instant) -> bool {
        let step = self.frog.step(
            now,
            self.config.timing.frog_move(),
            &self.grid,
            &self.obstacles,
            &self.snakes,
            &mut self.rng,
        );
        match step {
            FrogStep::Idle => return false,
            FrogStep::Spawned(at) => {
                debug!("Frog respawned at {}", at);
                self.events.push(ArenaEvent::FrogSpawned { at });
            }
            FrogStep::Moved { from, to } => debug!("Frog {} -> {}", from, to),
            FrogStep::Stayed(_) => {}
        }
        self.resolve(now);
        true
    }

    fn resolve(&mut self, now: Instant) {
        let resolution = CollisionResolver {
            grid: &self.grid,
            obstacles: &self.obstacles,
            snakes: &mut self.snakes,
            food: &mut self.food,
            frog: &mut self.frog,
            rng: &mut self.rng,
            frog_respawn: self.config.timing.frog_respawn(),
        }
        .resolve(now);

        self.score += resolution.score_gained;
        self.events.extend(resolution.events);
        if let Some(cause) = resolution.full_reset {
            self.full_reset(cause, now);
        }
    }

    fn snake_delay(&self, role: Role) -> std::time::Duration {
        let level = self.config.levels.for_level(self.level);
        if role.is_ai() {
            level.ai_delay()
        } else {
            level.player_delay()
        }
    }

    /// When `agent` next wants to act; `None` for dead snakes and a cleared frog
    pub fn next_due(&self, agent: Agent) -> Option<Instant> {
        match agent.role() {
            Some(role) => {
                let snake = &self.snakes[role.index()];
                snake
                    .is_alive()
                    .then(|| snake.last_move() + self.snake_delay(role))
            }
            None if agent == Agent::FoodPool => {
                Some(self.food_last + self.config.timing.food_refill())
            }
            None => self.frog.next_due(self.config.timing.frog_move()),
        }
    }

    pub fn is_due_to_step(&self, now: Instant) -> bool {
        self.screen == Screen::Game
            && Agent::all()
                .iter()
                .any(|&agent| self.next_due(agent).is_some_and(|due| due <= now))
    }

    /// Steps every due agent in next-due order. Returns how many acted.
    pub fn tick(&mut self, now: Instant) -> usize {
        if self.screen != Screen::Game {
            return 0;
        }
        let mut scheduler = Scheduler::new();
        for agent in Agent::all() {
            if let Some(due) = self.next_due(agent) {
                scheduler.schedule(agent, due);
            }
        }

        let mut acted = 0;
        while let Some(agent) = scheduler.pop_due(now) {
            if self.step_agent(agent, now) {
                acted += 1;
            }
        }
        acted
    }

    // ---- read access ----

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake(&self, role: Role) -> &Snake {
        &self.snakes[role.index()]
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn food(&self) -> &FoodPool {
        &self.food
    }

    pub fn frog(&self) -> &Frog {
        &self.frog
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn drain_events(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot::capture(self)
    }

    pub fn score_page(&self, offset: usize, limit: usize) -> ScorePage {
        ScorePage::from_ledger(&self.ledger, offset, limit)
    }

    // ---- scenario setup ----

    pub fn snake_mut(&mut self, role: Role) -> &mut Snake {
        &mut self.snakes[role.index()]
    }

    pub fn obstacles_mut(&mut self) -> &mut ObstacleField {
        &mut self.obstacles
    }

    pub fn food_mut(&mut self) -> &mut FoodPool {
        &mut self.food
    }

    pub fn frog_mut(&mut self) -> &mut Frog {
        &mut self.frog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::MemoryScoreStore;
    use std::time::Duration;

    fn arena(now: Instant) -> Arena {
        let mut config = Config::default_hardcoded();
        config.session.seed = Some(42);
        Arena::new(config, Box::new(MemoryScoreStore::new()), now)
    }

    #[test]
    fn test_menu_navigation() {
        let now = Instant::now();
        let mut arena = arena(now);
        assert_eq!(arena.screen(), Screen::Menu);

        assert!(arena.select_menu_option(MENU_SCORE_BOARD, now));
        assert_eq!(arena.screen(), Screen::ScoreBoard);
        assert!(!arena.select_menu_option(MENU_EASY, now));
        assert!(arena.request_back_to_menu());

        assert!(arena.select_menu_option(MENU_MULTIPLAYER, now));
        assert!(!arena.select_menu_option(1, now));
        assert_eq!(arena.screen(), Screen::MultiplayerMenu);
        assert!(arena.request_back_to_menu());

        assert!(!arena.request_back_to_menu());
        assert!(!arena.select_menu_option(9, now));
        assert!(arena.request_scoreboard());
    }

    #[test]
    fn test_level_selection_configures_board() {
        let now = Instant::now();
        let mut arena = arena(now);
        assert!(arena.select_menu_option(MENU_HARD, now));
        assert_eq!(arena.screen(), Screen::Game);
        assert_eq!(arena.level(), Level::Hard);
        assert!(arena.obstacles().len() <= 15);
        assert_eq!(arena.food().len(), 3);
        assert!(arena.frog().is_present());

        let events = arena.drain_events();
        assert!(events.contains(&ArenaEvent::LevelStarted {
            level: Level::Hard,
            obstacles: arena.obstacles().len(),
        }));
        assert!(arena.drain_events().is_empty());
    }

    #[test]
    fn test_steps_are_noops_off_the_game_screen() {
        let now = Instant::now();
        let mut arena = arena(now);
        let later = now + Duration::from_secs(1);
        for agent in Agent::all() {
            assert!(!arena.step_agent(agent, later));
        }
        assert!(!arena.is_due_to_step(later));
        assert_eq!(arena.tick(later), 0);
        assert!(!arena.on_direction_input(Direction::Up));
    }

    #[test]
    fn test_requested_reset_records_score() {
        let now = Instant::now();
        let mut arena = arena(now);
        arena.select_menu_option(MENU_MEDIUM, now);
        assert!(arena.request_reset(now));
        assert_eq!(arena.screen(), Screen::Menu);
        assert_eq!(arena.ledger().len(), 1);
        assert_eq!(arena.ledger().entries()[0].level, Level::Medium);
        assert!(!arena.frog().is_present());
        assert!(!arena.request_reset(now));
    }

    #[test]
    fn test_tick_respects_cadence() {
        let now = Instant::now();
        let mut arena = arena(now);
        arena.select_menu_option(MENU_EASY, now);
        assert!(!arena.is_due_to_step(now + Duration::from_millis(50)));
        assert_eq!(arena.tick(now + Duration::from_millis(50)), 0);

        let due = now + Duration::from_millis(100);
        assert!(arena.is_due_to_step(due));
        // player and both AIs are due at 100ms; food and frog are not
        assert_eq!(arena.tick(due), 3);
        assert_eq!(arena.tick(due), 0);
    }
}
