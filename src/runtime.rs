// Concurrent host for the arena: one tokio task per agent.
//
// All tasks share one `parking_lot::Mutex<Arena>`. A task holds the lock for
// exactly one agent step, so no task can observe a half-applied move or a
// half-regenerated board. Loops are cancelled cooperatively through a liveness
// flag checked on every iteration.

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::arena::Arena;
use crate::clock::Agent;
use crate::journal::EventJournal;

/// State shared by the runtime and every agent task
#[derive(Clone)]
struct Shared {
    arena: Arc<Mutex<Arena>>,
    journal: EventJournal,
    running: Arc<AtomicBool>,
}

impl Shared {
    /// Runs `f` under the arena lock, then hands buffered events to the journal
    fn apply<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> R {
        let (result, events) = {
            let mut arena = self.arena.lock();
            let result = f(&mut arena);
            (result, arena.drain_events())
        };
        self.journal.record_all(events);
        result
    }
}

pub struct ArenaRuntime {
    shared: Shared,
    poll_interval: Duration,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ArenaRuntime {
    pub fn new(arena: Arena, journal: EventJournal) -> Self {
        let poll_interval = arena.config().timing.poll_interval();
        ArenaRuntime {
            shared: Shared {
                arena: Arc::new(Mutex::new(arena)),
                journal,
                running: Arc::new(AtomicBool::new(false)),
            },
            poll_interval,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Direct handle to the monitor
    pub fn arena(&self) -> Arc<Mutex<Arena>> {
        self.shared.arena.clone()
    }

    /// Mutates the arena atomically and journals whatever it emitted
    pub fn with_arena<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> R {
        self.shared.apply(f)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        let arena = self.shared.arena.lock();
        f(&*arena)
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Spawns one loop per agent. Must be called inside a tokio runtime.
    /// Returns false if the loops are already running.
    pub fn start(&self) -> bool {
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return false;
        }

        let mut tasks = self.tasks.lock();
        for agent in Agent::all() {
            let shared = self.shared.clone();
            let poll = self.poll_interval;
            tasks.push(tokio::spawn(async move {
                run_agent(agent, shared, poll).await;
            }));
        }
        info!(
            "Started {} agent loops ({}ms poll)",
            tasks.len(),
            self.poll_interval.as_millis()
        );
        true
    }

    /// Signals every loop to stop; each exits within one poll interval
    pub fn stop(&self) {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            info!("Stopping agent loops");
        }
    }

    /// Stops the loops and waits for them to finish
    pub async fn shutdown(&self) {
        self.stop();
        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            let _ = task.await;
        }
    }
}

async fn run_agent(agent: Agent, shared: Shared, poll: Duration) {
    debug!("{} loop started", agent.as_str());
    while shared.running.load(Ordering::Acquire) {
        tokio::time::sleep(poll).await;
        // a stop issued during the sleep must not let one more step through
        if !shared.running.load(Ordering::Acquire) {
            break;
        }
        shared.apply(|arena| arena.step_agent(agent, Instant::now()));
    }
    debug!("{} loop stopped", agent.as_str());
}
