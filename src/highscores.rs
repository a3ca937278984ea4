//! Per-player highscore table
//!
//! One best score per player name. The table is shared between the session
//! and the persistence path, so it normally lives behind [`SharedHighScores`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Rows shown on the highscore board
pub const MAX_BOARD_ROWS: usize = 10;

/// Highscore table shared with the persistence collaborator
pub type SharedHighScores = Arc<Mutex<HighScores>>;

/// Wrap a table for sharing
pub fn shared(scores: HighScores) -> SharedHighScores {
    Arc::new(Mutex::new(scores))
}

/// Player name → best score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    best: HashMap<String, u64>,
}

impl HighScores {
    /// Create empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for a player (0 if unknown)
    pub fn best(&self, name: &str) -> u64 {
        self.best.get(name).copied().unwrap_or(0)
    }

    /// Record a score if it beats the player's best
    ///
    /// Returns true when the table changed.
    pub fn commit(&mut self, name: &str, score: u64) -> bool {
        let entry = self.best.entry(name.to_string()).or_insert(0);
        if score > *entry {
            log::info!("New best for {name}: {score} (was {entry})");
            *entry = score;
            true
        } else {
            false
        }
    }

    /// Make sure a player has a row; returns true if one was added
    pub fn ensure_player(&mut self, name: &str) -> bool {
        if self.best.contains_key(name) {
            return false;
        }
        self.best.insert(name.to_string(), 0);
        true
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// Highest score across all players
    pub fn top_score(&self) -> Option<u64> {
        self.best.values().copied().max()
    }

    /// Board order: best first, ties broken by name
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut rows: Vec<(String, u64)> = self
            .best
            .iter()
            .map(|(name, score)| (name.clone(), *score))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows
    }

    /// 1-indexed board position of a player
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.ranked()
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| i + 1)
    }
}
