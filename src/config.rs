// Configuration module for reading Arena.toml
// Every tunable of the arena lives here: board geometry, cadences, level table,
// spawn layout, persistence paths.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::grid::Grid;
use crate::types::{Cell, Direction, Level};

/// Largest accepted board, in cells per side
pub const MAX_CELL_COUNT: u32 = 1_000;
/// Largest accepted cell, in pixels
pub const MAX_CELL_SIZE: u32 = 1_000;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    pub levels: LevelsConfig,
    pub food: FoodConfig,
    pub ai: AiConfig,
    pub spawn: SpawnConfig,
    pub scores: ScoresConfig,
    pub debug: DebugConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Board geometry
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub cell_size: u32,
    pub cell_count: u32,
}

impl GridConfig {
    pub fn grid(&self) -> Grid {
        Grid::new(self.cell_size, self.cell_count)
    }
}

/// Cadences of the non-snake agents and the runtime poll granularity
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub food_refill_ms: u64,
    pub frog_move_ms: u64,
    pub frog_respawn_ms: u64,
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn food_refill(&self) -> Duration {
        Duration::from_millis(self.food_refill_ms)
    }

    pub fn frog_move(&self) -> Duration {
        Duration::from_millis(self.frog_move_ms)
    }

    pub fn frog_respawn(&self) -> Duration {
        Duration::from_millis(self.frog_respawn_ms)
    }
}

/// Per-difficulty parameters
#[derive(Debug, Deserialize, Clone)]
pub struct LevelConfig {
    pub player_delay_ms: u64,
    pub ai_delay_ms: u64,
    pub obstacle_count: usize,
}

impl LevelConfig {
    pub fn player_delay(&self) -> Duration {
        Duration::from_millis(self.player_delay_ms)
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelsConfig {
    pub easy: LevelConfig,
    pub medium: LevelConfig,
    pub hard: LevelConfig,
}

impl LevelsConfig {
    pub fn for_level(&self, level: Level) -> &LevelConfig {
        match level {
            Level::Easy => &self.easy,
            Level::Medium => &self.medium,
            Level::Hard => &self.hard,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    pub pool_size: usize,
}

/// Which decision function AI snakes use
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiStrategyKind {
    Greedy,
    Wander,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    pub strategy: AiStrategyKind,
}

/// Starting body and heading of one snake
#[derive(Debug, Deserialize, Clone)]
pub struct StartConfig {
    pub direction: Direction,
    pub body: Vec<[i32; 2]>,
}

impl StartConfig {
    pub fn cells(&self) -> Vec<Cell> {
        self.body.iter().map(|&pair| Cell::from(pair)).collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpawnConfig {
    pub player: StartConfig,
    pub ai_one: StartConfig,
    pub ai_two: StartConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    pub max_entries: usize,
    pub store_path: String,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub journal_enabled: bool,
    pub journal_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    pub seed: Option<u64>,
}

impl Config {
    /// Loads configuration from a TOML file and validates it
    ///
    /// # Arguments
    /// * `path` - Path to the Arena.toml configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;

        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        Ok(config)
    }

    /// Loads default configuration from Arena.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Arena.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the values shipped in Arena.toml
    pub fn default_hardcoded() -> Self {
        Config {
            grid: GridConfig {
                cell_size: 26,
                cell_count: 26,
            },
            timing: TimingConfig {
                poll_interval_ms: 10,
                food_refill_ms: 500,
                frog_move_ms: 300,
                frog_respawn_ms: 5000,
            },
            levels: LevelsConfig {
                easy: LevelConfig {
                    player_delay_ms: 100,
                    ai_delay_ms: 100,
                    obstacle_count: 5,
                },
                medium: LevelConfig {
                    player_delay_ms: 50,
                    ai_delay_ms: 80,
                    obstacle_count: 10,
                },
                hard: LevelConfig {
                    player_delay_ms: 15,
                    ai_delay_ms: 60,
                    obstacle_count: 15,
                },
            },
            food: FoodConfig { pool_size: 3 },
            ai: AiConfig {
                strategy: AiStrategyKind::Greedy,
            },
            spawn: SpawnConfig {
                player: StartConfig {
                    direction: Direction::Right,
                    body: vec![[7, 6], [6, 6], [5, 6]],
                },
                ai_one: StartConfig {
                    direction: Direction::Right,
                    body: vec![[7, 13], [6, 13], [5, 13]],
                },
                ai_two: StartConfig {
                    direction: Direction::Right,
                    body: vec![[7, 16], [6, 16], [5, 16]],
                },
            },
            scores: ScoresConfig {
                max_entries: 100,
                store_path: "scores.json".to_string(),
            },
            debug: DebugConfig {
                journal_enabled: false,
                journal_path: "arena_journal.jsonl".to_string(),
            },
            session: SessionConfig { seed: None },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Arena.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Checks the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.grid.cell_size == 0 || self.grid.cell_count == 0 {
            return Err("Grid cell size and cell count must be positive".to_string());
        }
        if self.grid.cell_size > MAX_CELL_SIZE || self.grid.cell_count > MAX_CELL_COUNT {
            return Err(format!(
                "Grid cell size and cell count must not exceed {} and {}",
                MAX_CELL_SIZE, MAX_CELL_COUNT
            ));
        }
        if self.timing.poll_interval_ms == 0 || self.timing.poll_interval_ms > 16 {
            return Err("Poll interval must be between 1ms and 16ms".to_string());
        }
        if self.timing.food_refill_ms == 0
            || self.timing.frog_move_ms == 0
            || self.timing.frog_respawn_ms == 0
        {
            return Err("Food and frog cadences must be positive".to_string());
        }
        for level in Level::all() {
            let lc = self.levels.for_level(level);
            if lc.player_delay_ms == 0 || lc.ai_delay_ms == 0 {
                return Err(format!("Level {} delays must be positive", level.as_str()));
            }
        }
        if self.food.pool_size == 0 {
            return Err("Food pool size must be positive".to_string());
        }
        if self.scores.max_entries == 0 {
            return Err("Score ledger must keep at least one entry".to_string());
        }

        let grid = self.grid.grid();
        for (name, start) in [
            ("player", &self.spawn.player),
            ("ai_one", &self.spawn.ai_one),
            ("ai_two", &self.spawn.ai_two),
        ] {
            if start.body.is_empty() {
                return Err(format!("Spawn body for {} must not be empty", name));
            }
            if let Some(cell) = start.cells().iter().find(|c| !grid.in_bounds(c)) {
                return Err(format!("Spawn body for {} leaves the board at {}", name, cell));
            }
        }

        Ok(())
    }
}
