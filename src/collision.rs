// Collision classification and resolution.
//
// One pass over all entities after any agent acts. Classes are checked in a
// fixed order: food, frog, bodies, obstacles, walls. The player's fatal
// collisions end the session (a full reset the arena performs); an AI's fatal
// collisions only kill that AI.

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::events::ArenaEvent;
use crate::food::FoodPool;
use crate::frog::Frog;
use crate::grid::Grid;
use crate::obstacles::ObstacleField;
use crate::rng::SessionRng;
use crate::snake::Snake;
use crate::types::{Cell, DeathCause, Role};

/// Segments and points for eating the frog
pub const FROG_VALUE: u32 = 2;

/// What one resolve pass decided
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolution {
    pub events: Vec<ArenaEvent>,
    /// Points the player earned in this pass
    pub score_gained: u32,
    /// Set when the player died: the arena must run a full reset
    pub full_reset: Option<DeathCause>,
}

impl Resolution {
    pub fn is_full_reset(&self) -> bool {
        self.full_reset.is_some()
    }
}

/// Mutable view of everything a resolve pass may touch
pub struct CollisionResolver<'a> {
    pub grid: &'a Grid,
    pub obstacles: &'a ObstacleField,
    pub snakes: &'a mut [Snake],
    pub food: &'a mut FoodPool,
    pub frog: &'a mut Frog,
    pub rng: &'a mut SessionRng,
    pub frog_respawn: Duration,
}

impl<'a> CollisionResolver<'a> {
    pub fn resolve(mut self, now: Instant) -> Resolution {
        let mut resolution = Resolution::default();

        self.resolve_food(&mut resolution);
        self.resolve_frog(now, &mut resolution);

        let fatal = self
            .body_collision(&mut resolution)
            .or_else(|| self.obstacle_collision(&mut resolution))
            .or_else(|| self.wall_collision(&mut resolution));
        if let Some(cause) = fatal {
            info!("Player died: {}", cause.as_str());
            resolution.full_reset = Some(cause);
        }

        resolution
    }

    fn resolve_food(&mut self, resolution: &mut Resolution) {
        for i in 0..self.snakes.len() {
            let snake = &self.snakes[i];
            if !snake.is_alive() {
                continue;
            }
            let Some(head) = snake.head() else {
                continue;
            };
            let Some(slot) = self.food.slot_at(&head) else {
                continue;
            };

            let eaten = self
                .food
                .replace(slot, self.grid, self.obstacles, &*self.snakes, &mut *self.rng);
            let Some(eaten) = eaten else {
                continue;
            };

            let role = self.snakes[i].role();
            let value = eaten.kind.value();
            self.snakes[i].grow(value);
            if role == Role::Player {
                resolution.score_gained += value;
            }
            debug!("{} ate {:?} at {}", role.as_str(), eaten.kind, head);
            resolution.events.push(ArenaEvent::FoodEaten {
                role,
                kind: eaten.kind,
                at: head,
                slot,
            });
        }
    }

    fn resolve_frog(&mut self, now: Instant, resolution: &mut Resolution) {
        let Some(frog_at) = self.frog.position() else {
            return;
        };
        let eater = self
            .snakes
            .iter_mut()
            .find(|s| s.is_alive() && s.head() == Some(frog_at));
        if let Some(snake) = eater {
            let role = snake.role();
            snake.grow(FROG_VALUE);
            if role == Role::Player {
                resolution.score_gained += FROG_VALUE;
            }
            self.frog.eaten(now, self.frog_respawn);
            debug!("{} ate the frog at {}", role.as_str(), frog_at);
            resolution.events.push(ArenaEvent::FrogEaten { role, at: frog_at });
        }
    }

    /// Body class. AI deaths are applied in role order, so an AI that died
    /// earlier in the pass no longer blocks its rival.
    fn body_collision(&mut self, resolution: &mut Resolution) -> Option<DeathCause> {
        if let Some(head) = self.living_head(Role::Player) {
            let own_body = self
                .snake(Role::Player)
                .is_some_and(|p| p.body_without_head_contains(&head));
            if own_body {
                return Some(DeathCause::SelfCollision);
            }
            let hits_ai = self
                .snakes
                .iter()
                .any(|s| s.role().is_ai() && s.is_alive() && s.contains(&head));
            if hits_ai {
                return Some(DeathCause::SnakeCollision);
            }
        }

        for role in [Role::AiOne, Role::AiTwo] {
            let Some(head) = self.living_head(role) else {
                continue;
            };
            if self.player_contains(&head) {
                return Some(DeathCause::SnakeCollision);
            }

            let rival_hit = role.rival().is_some_and(|rival| {
                self.snakes
                    .iter()
                    .any(|s| s.role() == rival && s.is_alive() && s.contains(&head))
            });
            let self_hit = self
                .snake(role)
                .is_some_and(|s| s.body_without_head_contains(&head));

            if rival_hit {
                self.kill_ai(role, DeathCause::SnakeCollision, resolution);
            } else if self_hit {
                self.kill_ai(role, DeathCause::SelfCollision, resolution);
            }
        }
        None
    }

    fn obstacle_collision(&mut self, resolution: &mut Resolution) -> Option<DeathCause> {
        self.fatal_cell_check(
            |arena, head| arena.obstacles.contains(head),
            DeathCause::ObstacleCollision,
            resolution,
        )
    }

    fn wall_collision(&mut self, resolution: &mut Resolution) -> Option<DeathCause> {
        self.fatal_cell_check(
            |arena, head| !arena.grid.in_bounds(head),
            DeathCause::WallCollision,
            resolution,
        )
    }

    /// Player on a fatal cell ends the session; an AI on one dies
    fn fatal_cell_check(
        &mut self,
        fatal: impl Fn(&Self, &Cell) -> bool,
        cause: DeathCause,
        resolution: &mut Resolution,
    ) -> Option<DeathCause> {
        if let Some(head) = self.living_head(Role::Player) {
            if fatal(self, &head) {
                return Some(cause);
            }
        }
        for role in [Role::AiOne, Role::AiTwo] {
            if let Some(head) = self.living_head(role) {
                if fatal(self, &head) {
                    self.kill_ai(role, cause, resolution);
                }
            }
        }
        None
    }

    fn snake(&self, role: Role) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.role() == role)
    }

    fn living_head(&self, role: Role) -> Option<Cell> {
        self.snake(role).filter(|s| s.is_alive()).and_then(|s| s.head())
    }

    fn player_contains(&self, cell: &Cell) -> bool {
        self.snake(Role::Player)
            .is_some_and(|p| p.is_alive() && p.contains(cell))
    }

    fn kill_ai(&mut self, role: Role, cause: DeathCause, resolution: &mut Resolution) {
        if let Some(snake) = self.snakes.iter_mut().find(|s| s.role() == role) {
            let length = snake.len();
            snake.die();
            info!("{} died: {} (length {})", role.as_str(), cause.as_str(), length);
            resolution.events.push(ArenaEvent::AiDied {
                role,
                cause,
                length,
            });
        }
    }
}
