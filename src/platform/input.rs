//! Discrete player intents
//!
//! The host translates raw device input (keys, clicks, menu buttons) into
//! these; the state machine only ever sees intents.

/// One player intent
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Flap (also unpauses, and restarts after game over)
    Flap,
    PauseToggle,
    MenuToggle,
    /// Start a run from the main menu
    StartGame,
    Restart,
    /// Switch between the game-over card and the highscore board
    ToggleHighscores,
    /// Switch the active player, creating their highscore entry
    ChangeUser(String),
    SetDifficulty(f32),
}
