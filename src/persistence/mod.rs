//! Highscore persistence
//!
//! Features:
//! - Narrow load/save trait the session talks to
//! - JSON file store with atomic replace (tmp → rename)
//! - In-memory store for tests and headless runs
//!
//! Failures never reach the game: stores log and fall back to an empty table.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::highscores::HighScores;

/// File name inside the data directory
pub const HIGHSCORES_FILE: &str = "highscores.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("highscore file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("highscore file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where highscores come from and go to
pub trait HighScoreStore {
    /// Best-effort load; an unreadable source yields an empty table
    fn load(&mut self) -> HighScores;

    /// Best-effort save; failures are logged, not returned
    fn save(&mut self, scores: &HighScores);
}

/// Platform data directory for this game, if the OS has one
pub fn default_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "paulrobello", "sky-flap")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default highscore file location
pub fn default_highscores_path() -> Option<PathBuf> {
    default_data_dir().map(|dir| dir.join(HIGHSCORES_FILE))
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, distinguishing "no file yet" (`Ok(None)`) from real failures
    pub fn try_load(&self) -> Result<Option<HighScores>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Write to a sibling temp file, then rename over the target
    pub fn try_save(&self, scores: &HighScores) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(scores)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> HighScores {
        match self.try_load() {
            Ok(Some(scores)) => {
                log::info!(
                    "Loaded {} highscores from {}",
                    scores.len(),
                    self.path.display()
                );
                scores
            }
            Ok(None) => {
                log::info!("No highscores at {}, starting fresh", self.path.display());
                HighScores::new()
            }
            Err(e) => {
                log::warn!("Ignoring highscores at {}: {e}", self.path.display());
                HighScores::new()
            }
        }
    }

    fn save(&mut self, scores: &HighScores) {
        match self.try_save(scores) {
            Ok(()) => log::debug!("Highscores saved ({} players)", scores.len()),
            Err(e) => log::warn!("Failed to save highscores to {}: {e}", self.path.display()),
        }
    }
}

/// Keeps the last saved table in memory
///
/// Clones share the same snapshot, so a test can hand one to the session and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Arc<Mutex<Option<HighScores>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved table, if any
    pub fn snapshot(&self) -> Option<HighScores> {
        self.saved.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> HighScores {
        self.saved.lock().clone().unwrap_or_default()
    }

    fn save(&mut self, scores: &HighScores) {
        *self.saved.lock() = Some(scores.clone());
        *self.saves.lock() += 1;
    }
}
