// Score ledger and its persistence contract

use log::warn;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::Level;

/// Format of `ScoreEntry::timestamp`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One finished session
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub timestamp: String,
    pub score: u32,
    pub level: Level,
}

impl ScoreEntry {
    /// Entry stamped with the current local time
    pub fn now(score: u32, level: Level) -> Self {
        ScoreEntry {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            score,
            level,
        }
    }
}

/// Best-first list of finished sessions, capped at `max_entries`.
/// Among equal scores the most recent entry comes first.
#[derive(Debug, Clone)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
    max_entries: usize,
}

impl ScoreLedger {
    pub fn new(max_entries: usize) -> Self {
        ScoreLedger {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Ledger from stored entries, re-sorted and truncated
    pub fn from_entries(mut entries: Vec<ScoreEntry>, max_entries: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(max_entries);
        ScoreLedger {
            entries,
            max_entries,
        }
    }

    /// Records a session stamped now; see `add_entry`
    pub fn add_score(&mut self, score: u32, level: Level) -> Option<usize> {
        self.add_entry(ScoreEntry::now(score, level))
    }

    /// Inserts, keeps the list sorted descending and drops the overflow.
    /// Returns the new entry's rank, or `None` if it did not make the cut.
    pub fn add_entry(&mut self, entry: ScoreEntry) -> Option<usize> {
        let score = entry.score;
        self.entries.insert(0, entry);
        // stable: the fresh entry stays ahead of older equal scores
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        let rank = self.entries.iter().position(|e| e.score == score);
        self.entries.truncate(self.max_entries);
        rank.filter(|&r| r < self.max_entries)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Visible window for a scrolling view. The offset is clamped to
    /// `[0, len - limit]`; returns the effective offset and the window.
    pub fn page(&self, offset: usize, limit: usize) -> (usize, &[ScoreEntry]) {
        let max_offset = self.entries.len().saturating_sub(limit);
        let offset = offset.min(max_offset);
        let end = (offset + limit).min(self.entries.len());
        (offset, &self.entries[offset..end])
    }
}

/// Persistence collaborator for the ledger
pub trait ScoreStore: Send {
    fn load(&self) -> Result<Vec<ScoreEntry>, String>;
    fn save(&self, entries: &[ScoreEntry]) -> Result<(), String>;
}

/// Loads a ledger, treating any store error as an empty list
pub fn load_ledger(store: &dyn ScoreStore, max_entries: usize) -> ScoreLedger {
    match store.load() {
        Ok(entries) => ScoreLedger::from_entries(entries, max_entries),
        Err(e) => {
            warn!("Score store unreadable, starting empty: {}", e);
            ScoreLedger::new(max_entries)
        }
    }
}

/// JSON array on disk. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileScoreStore {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(format!(
                    "Failed to read score file '{}': {}",
                    self.path.display(),
                    e
                ))
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            format!(
                "Failed to parse score file '{}': {}",
                self.path.display(),
                e
            )
        })
    }

    fn save(&self, entries: &[ScoreEntry]) -> Result<(), String> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| format!("Failed to serialize scores: {}", e))?;
        fs::write(&self.path, json).map_err(|e| {
            format!(
                "Failed to write score file '{}': {}",
                self.path.display(),
                e
            )
        })
    }
}

/// In-memory store; clones share the same backing list
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    entries: Arc<Mutex<Vec<ScoreEntry>>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        MemoryScoreStore {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn saved(&self) -> Vec<ScoreEntry> {
        self.entries.lock().clone()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, String> {
        Ok(self.entries.lock().clone())
    }

    fn save(&self, entries: &[ScoreEntry]) -> Result<(), String> {
        *self.entries.lock() = entries.to_vec();
        Ok(())
    }
}
