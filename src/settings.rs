//! Game settings and preferences
//!
//! Persisted as JSON next to the highscore file, separately from tuning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tuning::ConfigError;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
    /// Use `Settings::custom_multiplier`
    Custom,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
            DifficultyPreset::Custom => "Custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "norm" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            "custom" => Some(DifficultyPreset::Custom),
            _ => None,
        }
    }

    /// Speed/spawn multiplier for this preset (None for custom)
    pub fn multiplier(&self) -> Option<f32> {
        match self {
            DifficultyPreset::Easy => Some(0.7),
            DifficultyPreset::Normal => Some(1.0),
            DifficultyPreset::Hard => Some(1.5),
            DifficultyPreset::Custom => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name highscores are recorded under
    pub player_name: String,

    // === Gameplay ===
    pub difficulty: DifficultyPreset,
    /// Multiplier used when `difficulty` is `Custom`
    pub custom_multiplier: f32,

    // === Visual Effects ===
    /// Screen shake on death
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),

            difficulty: DifficultyPreset::Normal,
            custom_multiplier: 1.0,

            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective difficulty multiplier (falls back to 1.0 for a bad custom value)
    pub fn difficulty_multiplier(&self) -> f32 {
        match self.difficulty.multiplier() {
            Some(m) => m,
            None if self.custom_multiplier.is_finite() && self.custom_multiplier > 0.0 => {
                self.custom_multiplier
            }
            None => 1.0,
        }
    }

    /// Record a multiplier chosen at runtime, snapping to a preset when it matches one
    pub fn set_difficulty_multiplier(&mut self, multiplier: f32) {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return;
        }
        let preset = [
            DifficultyPreset::Easy,
            DifficultyPreset::Normal,
            DifficultyPreset::Hard,
        ]
        .into_iter()
        .find(|p| p.multiplier().is_some_and(|m| (m - multiplier).abs() < 1e-4));

        match preset {
            Some(p) => self.difficulty = p,
            None => {
                self.difficulty = DifficultyPreset::Custom;
                self.custom_multiplier = multiplier;
            }
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save settings as JSON (best effort)
    pub fn save(&self, path: &Path) {
        let result = serde_json::to_string_pretty(self)
            .map_err(ConfigError::from)
            .and_then(|json| {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    fs::create_dir_all(dir)?;
                }
                fs::write(path, json)?;
                Ok(())
            });
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings to {}: {e}", path.display()),
        }
    }
}
