//! Per-user high-score table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Entries ordered by descending score, capped at `capacity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
    capacity: usize,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Build from stored entries, restoring order and the cap in case the
    /// stored list was edited by hand.
    pub fn from_entries(mut entries: Vec<HighScoreEntry>, capacity: usize) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);
        Self { entries, capacity }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert `score` ahead of the first entry it beats.  Returns the index
    /// it landed at, or `None` when it does not qualify (zero, or lower than
    /// every entry of a full table).
    pub fn insert(&mut self, name: impl Into<String>, score: u32) -> Option<usize> {
        if score == 0 || self.capacity == 0 {
            return None;
        }
        let index = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => i,
            None if self.entries.len() < self.capacity => self.entries.len(),
            None => return None,
        };
        self.entries.insert(
            index,
            HighScoreEntry {
                name: name.into(),
                score,
            },
        );
        self.entries.truncate(self.capacity);
        Some(index)
    }
}
