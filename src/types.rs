// Arena value types
// Cells, directions, roles and the small enums shared by every module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One grid square addressed by integer coordinates.
/// Coordinates may go negative or past the edge transiently (a head that just
/// left the board); `Grid::in_bounds` decides legality.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<[i32; 2]> for Cell {
    fn from(pair: [i32; 2]) -> Self {
        Cell::new(pair[0], pair[1])
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the four possible movement directions.
/// Screen coordinates: y grows downwards, so `Up` decrements y.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in decision order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a case-insensitive direction name
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Unit delta of one step in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    /// Calculates the next cell when moving in this direction
    pub fn apply(&self, cell: &Cell) -> Cell {
        let (dx, dy) = self.delta();
        Cell::new(cell.x + dx, cell.y + dy)
    }

    /// Sprite rotation in degrees used by renderers
    pub fn angle(&self) -> u16 {
        match self {
            Direction::Right => 0,
            Direction::Down => 90,
            Direction::Left => 180,
            Direction::Up => 270,
        }
    }
}

/// Which snake an entity is. Behaviour differences are data-driven off this tag.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    AiOne,
    AiTwo,
}

impl Role {
    pub fn all() -> [Role; 3] {
        [Role::Player, Role::AiOne, Role::AiTwo]
    }

    pub fn is_ai(&self) -> bool {
        !matches!(self, Role::Player)
    }

    /// Position in the arena's snake array
    pub fn index(&self) -> usize {
        match self {
            Role::Player => 0,
            Role::AiOne => 1,
            Role::AiTwo => 2,
        }
    }

    /// The other AI, for AI roles
    pub fn rival(&self) -> Option<Role> {
        match self {
            Role::Player => None,
            Role::AiOne => Some(Role::AiTwo),
            Role::AiTwo => Some(Role::AiOne),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::AiOne => "ai#1",
            Role::AiTwo => "ai#2",
        }
    }
}

/// Difficulty level selected from the menu
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub fn all() -> [Level; 3] {
        [Level::Easy, Level::Medium, Level::Hard]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

/// Screens of the game state machine
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Menu,
    Game,
    ScoreBoard,
    MultiplayerMenu,
}

/// Fruit variants. `Golden` is worth double growth and score.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Apple,
    Pear,
    Cherry,
    Golden,
}

impl FoodKind {
    pub fn all() -> [FoodKind; 4] {
        [FoodKind::Apple, FoodKind::Pear, FoodKind::Cherry, FoodKind::Golden]
    }

    /// Segments gained and points scored for eating this kind
    pub fn value(&self) -> u32 {
        match self {
            FoodKind::Golden => 2,
            _ => 1,
        }
    }
}

/// Why a snake stopped: the collision class that ended it
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    SelfCollision,
    SnakeCollision,
    ObstacleCollision,
    WallCollision,
    /// Session ended on request rather than by a collision
    Requested,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::SelfCollision => "self collision",
            DeathCause::SnakeCollision => "snake collision",
            DeathCause::ObstacleCollision => "obstacle collision",
            DeathCause::WallCollision => "wall collision",
            DeathCause::Requested => "requested",
        }
    }
}
