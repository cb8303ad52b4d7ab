use thiserror::Error;

/// Failures at the edges of the game core (settings, names, JSON data).
/// Gameplay itself never fails; it degrades to safe defaults instead.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("setting {name} out of range: {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[cfg(feature = "serde_json")]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
