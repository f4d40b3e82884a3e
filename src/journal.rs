// Event journal: fire-and-forget JSONL recording of arena events, plus the
// loader and statistics used by the journal-report tool.
//
// Batches go over a channel to one writer task, so agent loops never wait on
// disk and lines land in the order they were queued.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::events::ArenaEvent;

/// One line of the journal file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct JournalEntry {
    pub timestamp: String,
    pub event: ArenaEvent,
}

/// Shared journal handle; clones feed the same writer task
#[derive(Clone)]
pub struct EventJournal {
    sender: Option<UnboundedSender<Vec<JournalEntry>>>,
}

impl EventJournal {
    /// Opens (truncating) the journal file when `enabled` and starts its writer.
    /// An unopenable file disables the journal instead of failing.
    pub async fn new(enabled: bool, path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await
        {
            Ok(file) => {
                info!("Event journal enabled: {}", path);
                let (sender, receiver) = mpsc::unbounded_channel();
                tokio::spawn(Self::run_writer(file, receiver));
                EventJournal {
                    sender: Some(sender),
                }
            }
            Err(e) => {
                error!("Failed to create journal file '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        EventJournal { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queues `events` for writing. A disabled journal drops them immediately.
    pub fn record_all(&self, events: Vec<ArenaEvent>) {
        let Some(sender) = &self.sender else {
            return;
        };
        if events.is_empty() {
            return;
        }

        let timestamp = chrono::Utc::now().to_rfc3339();
        let entries: Vec<JournalEntry> = events
            .into_iter()
            .map(|event| JournalEntry {
                timestamp: timestamp.clone(),
                event,
            })
            .collect();

        if sender.send(entries).is_err() {
            error!("Journal writer has stopped; dropping events");
        }
    }

    /// Drains batches until every sender is gone
    async fn run_writer(mut file: File, mut receiver: UnboundedReceiver<Vec<JournalEntry>>) {
        while let Some(entries) = receiver.recv().await {
            let mut buffer = String::new();
            for entry in &entries {
                match serde_json::to_string(entry) {
                    Ok(line) => {
                        buffer.push_str(&line);
                        buffer.push('\n');
                    }
                    Err(e) => error!("Failed to serialize journal entry: {}", e),
                }
            }

            if let Err(e) = file.write_all(buffer.as_bytes()).await {
                error!("Failed to write journal entries: {}", e);
            } else if let Err(e) = file.flush().await {
                error!("Failed to flush journal: {}", e);
            }
        }
    }
}

/// Loads every entry from a JSONL journal, skipping blank lines
pub fn load_journal<P: AsRef<Path>>(path: P) -> Result<Vec<JournalEntry>, String> {
    let file = fs::File::open(path.as_ref())
        .map_err(|e| format!("Failed to open journal file: {}", e))?;

    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

        if line.trim().is_empty() {
            continue;
        }

        let entry: JournalEntry = serde_json::from_str(&line)
            .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;
        entries.push(entry);
    }

    info!("Loaded {} journal entries", entries.len());
    Ok(entries)
}

/// Totals over a journal
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JournalStats {
    pub total_events: usize,
    pub sessions: usize,
    pub total_score: u64,
    pub best_score: u32,
    pub average_score: f64,
    pub resets_by_cause: BTreeMap<String, usize>,
    pub ai_deaths_by_cause: BTreeMap<String, usize>,
    pub levels_started: BTreeMap<String, usize>,
    pub food_by_kind: BTreeMap<String, usize>,
    pub player_food: usize,
    pub frogs_eaten: usize,
    pub player_frogs: usize,
}

impl JournalStats {
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        let mut stats = JournalStats {
            total_events: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            match &entry.event {
                ArenaEvent::SessionReset { cause, score, .. } => {
                    stats.sessions += 1;
                    stats.total_score += u64::from(*score);
                    stats.best_score = stats.best_score.max(*score);
                    *stats
                        .resets_by_cause
                        .entry(cause.as_str().to_string())
                        .or_default() += 1;
                }
                ArenaEvent::AiDied { cause, .. } => {
                    *stats
                        .ai_deaths_by_cause
                        .entry(cause.as_str().to_string())
                        .or_default() += 1;
                }
                ArenaEvent::LevelStarted { level, .. } => {
                    *stats
                        .levels_started
                        .entry(level.as_str().to_string())
                        .or_default() += 1;
                }
                ArenaEvent::FoodEaten { role, kind, .. } => {
                    *stats.food_by_kind.entry(format!("{:?}", kind)).or_default() += 1;
                    if !role.is_ai() {
                        stats.player_food += 1;
                    }
                }
                ArenaEvent::FrogEaten { role, .. } => {
                    stats.frogs_eaten += 1;
                    if !role.is_ai() {
                        stats.player_frogs += 1;
                    }
                }
                ArenaEvent::ScreenChanged { .. } | ArenaEvent::FrogSpawned { .. } => {}
            }
        }

        if stats.sessions > 0 {
            stats.average_score = stats.total_score as f64 / stats.sessions as f64;
        }
        stats
    }
}

fn print_counts(title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!("{}:", title);
    for (name, count) in counts {
        println!("  {:<22}{}", name, count);
    }
}

/// Prints a summary report
pub fn print_report(stats: &JournalStats) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("                    ARENA JOURNAL REPORT");
    println!("═══════════════════════════════════════════════════════════");
    println!("Events:         {}", stats.total_events);
    println!("Sessions:       {}", stats.sessions);
    println!("Best Score:     {}", stats.best_score);
    println!("Average Score:  {:.1}", stats.average_score);
    println!("═══════════════════════════════════════════════════════════\n");

    print_counts("Levels started", &stats.levels_started);
    print_counts("Sessions ended by", &stats.resets_by_cause);
    print_counts("AI deaths by", &stats.ai_deaths_by_cause);
    print_counts("Food eaten by kind", &stats.food_by_kind);
    println!(
        "Player food:    {}   Frogs: {} (player {})\n",
        stats.player_food, stats.frogs_eaten, stats.player_frogs
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, DeathCause, FoodKind, Level, Role};

    fn entry(event: ArenaEvent) -> JournalEntry {
        JournalEntry {
            timestamp: "2025-01-01T00:00:00+00:00".to_string(),
            event,
        }
    }

    #[test]
    fn test_stats() {
        let entries = vec![
            entry(ArenaEvent::LevelStarted {
                level: Level::Hard,
                obstacles: 15,
            }),
            entry(ArenaEvent::FoodEaten {
                role: Role::Player,
                kind: FoodKind::Golden,
                at: Cell::new(1, 1),
                slot: 0,
            }),
            entry(ArenaEvent::FoodEaten {
                role: Role::AiOne,
                kind: FoodKind::Apple,
                at: Cell::new(2, 1),
                slot: 1,
            }),
            entry(ArenaEvent::FrogEaten {
                role: Role::AiTwo,
                at: Cell::new(4, 4),
            }),
            entry(ArenaEvent::AiDied {
                role: Role::AiTwo,
                cause: DeathCause::WallCollision,
                length: 5,
            }),
            entry(ArenaEvent::SessionReset {
                cause: DeathCause::SelfCollision,
                score: 6,
                level: Level::Hard,
            }),
            entry(ArenaEvent::SessionReset {
                cause: DeathCause::WallCollision,
                score: 3,
                level: Level::Hard,
            }),
        ];

        let stats = JournalStats::from_entries(&entries);
        assert_eq!(stats.total_events, 7);
        assert_eq!(stats.sessions, 2);
        assert_eq!(stats.best_score, 6);
        assert!((stats.average_score - 4.5).abs() < f64::EPSILON);
        assert_eq!(stats.player_food, 1);
        assert_eq!(stats.food_by_kind.get("Golden"), Some(&1));
        assert_eq!(stats.frogs_eaten, 1);
        assert_eq!(stats.player_frogs, 0);
        assert_eq!(stats.ai_deaths_by_cause.get("wall collision"), Some(&1));
        assert_eq!(stats.levels_started.get("hard"), Some(&1));
    }

    #[test]
    fn test_load_journal_skips_blank_lines() {
        let path = std::env::temp_dir().join(format!("arena-journal-{}.jsonl", std::process::id()));
        let line = serde_json::to_string(&entry(ArenaEvent::FrogSpawned {
            at: Cell::new(3, 3),
        }))
        .unwrap();
        fs::write(&path, format!("{}\n\n{}\n", line, line)).unwrap();

        let entries = load_journal(&path).unwrap();
        assert_eq!(entries.len(), 2);

        fs::write(&path, "{broken").unwrap();
        assert!(load_journal(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_journal_needs_no_runtime() {
        let journal = EventJournal::disabled();
        assert!(!journal.is_enabled());
        journal.record_all(vec![ArenaEvent::FrogSpawned {
            at: Cell::new(0, 0),
        }]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_batches_land_in_queue_order() {
        let path = std::env::temp_dir().join(format!("arena-journal-order-{}.jsonl", std::process::id()));
        let journal = EventJournal::new(true, &path.to_string_lossy()).await;
        assert!(journal.is_enabled());

        for x in 0..200 {
            journal.record_all(vec![ArenaEvent::FrogSpawned {
                at: Cell::new(x, 0),
            }]);
        }
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;

        let xs: Vec<i32> = load_journal(&path)
            .unwrap()
            .iter()
            .map(|e| match &e.event {
                ArenaEvent::FrogSpawned { at } => at.x,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(xs, (0..200).collect::<Vec<i32>>());
        let _ = fs::remove_file(&path);
    }
}
