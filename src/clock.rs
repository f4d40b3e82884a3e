// Per-entity cadence gating and the next-due scheduler
//
// Every agent advances on its own delay. There is no global tick: an agent is
// due once its own delay has elapsed since it last acted.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use crate::types::Role;

/// Side-effect-free cadence gate. The caller updates `last` only when it acts.
pub fn due_to_move(last: Instant, delay: Duration, now: Instant) -> bool {
    now.saturating_duration_since(last) >= delay
}

/// An independently scheduled unit of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Agent {
    Player,
    AiOne,
    AiTwo,
    FoodPool,
    Frog,
}

impl Agent {
    /// Fixed order; also the tie-break when several agents fall due together
    pub fn all() -> [Agent; 5] {
        [
            Agent::Player,
            Agent::AiOne,
            Agent::AiTwo,
            Agent::FoodPool,
            Agent::Frog,
        ]
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Agent::Player => Some(Role::Player),
            Agent::AiOne => Some(Role::AiOne),
            Agent::AiTwo => Some(Role::AiTwo),
            Agent::FoodPool | Agent::Frog => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Agent::Player => "player",
            Agent::AiOne => "ai#1",
            Agent::AiTwo => "ai#2",
            Agent::FoodPool => "food",
            Agent::Frog => "frog",
        }
    }
}

/// Min-heap of (next due instant, agent). Rebuilt for each host tick from the
/// arena's current timestamps so it never holds a stale due time.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<(Instant, Agent)>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler {
            queue: BinaryHeap::new(),
        }
    }

    pub fn schedule(&mut self, agent: Agent, due_at: Instant) {
        self.queue.push(Reverse((due_at, agent)));
    }

    /// Pops the earliest agent if it is due at `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<Agent> {
        match self.queue.peek() {
            Some(Reverse((due, _))) if *due <= now => {
                self.queue.pop().map(|Reverse((_, agent))| agent)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
