// Typed record of what happened inside the arena.
// Buffered by the arena, drained by the runtime into the journal.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, DeathCause, FoodKind, Level, Role, Screen};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArenaEvent {
    ScreenChanged {
        from: Screen,
        to: Screen,
    },
    LevelStarted {
        level: Level,
        obstacles: usize,
    },
    FoodEaten {
        role: Role,
        kind: FoodKind,
        at: Cell,
        slot: usize,
    },
    FrogSpawned {
        at: Cell,
    },
    FrogEaten {
        role: Role,
        at: Cell,
    },
    AiDied {
        role: Role,
        cause: DeathCause,
        length: usize,
    },
    SessionReset {
        cause: DeathCause,
        score: u32,
        level: Level,
    },
}

impl ArenaEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ArenaEvent::ScreenChanged { .. } => "screen_changed",
            ArenaEvent::LevelStarted { .. } => "level_started",
            ArenaEvent::FoodEaten { .. } => "food_eaten",
            ArenaEvent::FrogSpawned { .. } => "frog_spawned",
            ArenaEvent::FrogEaten { .. } => "frog_eaten",
            ArenaEvent::AiDied { .. } => "ai_died",
            ArenaEvent::SessionReset { .. } => "session_reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json_shape() {
        let event = ArenaEvent::AiDied {
            role: Role::AiTwo,
            cause: DeathCause::WallCollision,
            length: 4,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ai_died");
        assert_eq!(json["role"], "ai_two");
        assert_eq!(json["cause"], "wall_collision");

        let back: ArenaEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.name(), "ai_died");
    }
}
