#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::CHAR_PIXEL_WIDTH;
use super::powerup::PowerUpKind;

pub type WordId = u64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Falling,
    /// Tombstone kept until the exit animation finishes.
    Destroyed,
}

/// Tag affecting scoring, matching and miss rules.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordCategory {
    Plain,
    PowerUp(PowerUpKind),
    Wave,
    /// Rewritten to a single shared letter by the unify power-up.
    Transformed,
    /// Bouncing letter fired by a boss.
    Projectile,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Horizontal drift per frame (projectiles only).
    pub vx: f64,
    pub status: WordStatus,
    pub category: WordCategory,
    /// When a destroyed word leaves the live list.
    pub remove_at: Option<f64>,
}

impl Word {
    pub fn new(id: WordId, text: impl Into<String>, x: f64, y: f64, category: WordCategory) -> Self {
        Self {
            id,
            text: text.into(),
            x,
            y,
            vx: 0.0,
            status: WordStatus::Falling,
            category,
            remove_at: None,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.status == WordStatus::Falling
    }

    pub fn is_power_up(&self) -> bool {
        matches!(self.category, WordCategory::PowerUp(_))
    }

    pub fn pixel_width(&self) -> f64 {
        estimated_width(&self.text)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.pixel_width() / 2.0, self.y)
    }

    /// Case-insensitive exact match.
    pub fn matches(&self, typed: &str) -> bool {
        self.text.eq_ignore_ascii_case(typed)
    }

    pub fn starts_with(&self, typed_lower: &str) -> bool {
        self.text.to_lowercase().starts_with(typed_lower)
    }

    /// `falling -> destroyed`; never the other way. Returns false if already destroyed.
    pub fn destroy(&mut self, now: f64, exit_delay: f64) -> bool {
        if !self.is_falling() {
            return false;
        }
        self.status = WordStatus::Destroyed;
        self.remove_at = Some(now + exit_delay);
        true
    }
}

pub fn estimated_width(text: &str) -> f64 {
    text.chars().count() as f64 * CHAR_PIXEL_WIDTH
}
