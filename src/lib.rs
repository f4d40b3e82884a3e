// Library exports for the snake arena
// The server binary and the journal report tool both build on these modules.

pub mod ai;
pub mod arena;
pub mod board;
pub mod clock;
pub mod collision;
pub mod config;
pub mod events;
pub mod food;
pub mod frog;
pub mod grid;
pub mod journal;
pub mod obstacles;
pub mod rng;
pub mod runtime;
pub mod scores;
pub mod snake;
pub mod snapshot;
pub mod types;
