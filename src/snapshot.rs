// Read-only views of the arena for renderers and the HTTP host

use serde::Serialize;

use crate::arena::Arena;
use crate::food::Food;
use crate::scores::{ScoreEntry, ScoreLedger};
use crate::snake::Snake;
use crate::types::{Cell, Direction, Level, Role, Screen};

#[derive(Debug, Clone, Serialize)]
pub struct GridInfo {
    pub cell_size: u32,
    pub cell_count: i32,
    pub side_length: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
    pub role: Role,
    pub alive: bool,
    pub moving: bool,
    pub direction: Direction,
    /// Head sprite rotation in degrees
    pub angle: u16,
    pub body: Vec<Cell>,
}

impl From<&Snake> for SnakeSnapshot {
    fn from(snake: &Snake) -> Self {
        SnakeSnapshot {
            role: snake.role(),
            alive: snake.is_alive(),
            moving: snake.movement_started(),
            direction: snake.direction(),
            angle: snake.angle(),
            body: snake.body().iter().copied().collect(),
        }
    }
}

/// Everything a frame needs, copied out under the arena lock
#[derive(Debug, Clone, Serialize)]
pub struct ArenaSnapshot {
    pub screen: Screen,
    pub level: Level,
    pub score: u32,
    pub best_score: Option<u32>,
    pub grid: GridInfo,
    pub snakes: Vec<SnakeSnapshot>,
    pub obstacles: Vec<Cell>,
    pub food: Vec<Food>,
    pub frog: Option<Cell>,
}

impl ArenaSnapshot {
    pub fn capture(arena: &Arena) -> Self {
        let grid = arena.grid();
        ArenaSnapshot {
            screen: arena.screen(),
            level: arena.level(),
            score: arena.score(),
            best_score: arena.ledger().best().map(|e| e.score),
            grid: GridInfo {
                cell_size: grid.cell_size(),
                cell_count: grid.cell_count(),
                side_length: grid.side_length(),
            },
            snakes: arena.snakes().iter().map(SnakeSnapshot::from).collect(),
            obstacles: arena.obstacles().cells().to_vec(),
            food: arena.food().slots().to_vec(),
            frog: arena.frog().position(),
        }
    }

    pub fn snake(&self, role: Role) -> Option<&SnakeSnapshot> {
        self.snakes.iter().find(|s| s.role == role)
    }
}

/// One scroll position of the score board
#[derive(Debug, Clone, Serialize)]
pub struct ScorePage {
    pub offset: usize,
    pub total: usize,
    pub entries: Vec<ScoreEntry>,
}

impl ScorePage {
    pub fn from_ledger(ledger: &ScoreLedger, offset: usize, limit: usize) -> Self {
        let (offset, entries) = ledger.page(offset, limit);
        ScorePage {
            offset,
            total: ledger.len(),
            entries: entries.to_vec(),
        }
    }
}
