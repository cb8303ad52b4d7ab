//! Tuning constants and per-session settings.
//!
//! Speeds are expressed in pixels per frame, durations in milliseconds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::GameError;

// --- Session ----------------------------------------------------------------

pub const INITIAL_LIVES: i32 = 3;
pub const LEVEL_UP_SCORE: u64 = 100;

// --- Motion / spawning -------------------------------------------------------

pub const WORD_FALL_SPEED_START: f64 = 0.5;
pub const WORD_FALL_SPEED_INCREASE: f64 = 0.1;

pub const WORD_SPAWN_RATE_START: f64 = 1800.0;
pub const WORD_SPAWN_RATE_DECREASE: f64 = 100.0;
pub const MIN_SPAWN_INTERVAL_MS: f64 = 200.0;

pub const SPAWN_Y: f64 = -20.0;
pub const CHAR_PIXEL_WIDTH: f64 = 12.0;
pub const SPAWN_TOP_BAND: f64 = 50.0;
pub const SPAWN_PLACEMENT_ATTEMPTS: usize = 15;
pub const POWERUP_SPAWN_CHANCE: f64 = 0.05;

pub const DEFAULT_FIELD_WIDTH: f64 = 800.0;
pub const DEFAULT_FIELD_HEIGHT: f64 = 600.0;

/// Delay between a word being destroyed and its removal from the live list.
pub const WORD_EXIT_DELAY_MS: f64 = 600.0;
/// Delay between a screen wipe and the removal of the wiped words.
pub const WIPE_EXIT_DELAY_MS: f64 = 300.0;

pub const RESUME_RAMP_MS: f64 = 1500.0;
pub const RESUME_RAMP_START: f64 = 0.1;
pub const LIFE_LOST_FREEZE_MS: f64 = 1500.0;

pub const INPUT_STATUS_REVERT_MS: f64 = 300.0;
pub const FLOATING_SCORE_LIFETIME_MS: f64 = 1000.0;

// --- Phases -----------------------------------------------------------------

pub const WORDS_PER_LEVEL_UNTIL_WAVE: u32 = 20;
pub const WAVE_WARNING_MS: f64 = 2000.0;
pub const WAVE_ACCELERATE_MS: f64 = 5000.0;
pub const WAVE_ACCELERATE_START_MULT: f64 = 1.0;
pub const WAVE_ACCELERATE_END_MULT: f64 = 2.5;
pub const WAVE_DELUGE_MULT: f64 = 1.3;
pub const WAVE_ACCELERATE_SPAWN_MS: f64 = 900.0;
pub const WAVE_DELUGE_SPAWN_MS: f64 = 250.0;
/// Number of wave words the deluge spawns before it can end.
pub const WAVE_DELUGE_WORD_COUNT: u32 = 25;
pub const WAVE_WORD_MIN_LEN: usize = 3;
pub const WAVE_WORD_MAX_LEN: usize = 5;
pub const LEVEL_TRANSITION_MS: f64 = 2000.0;

// --- Boss -------------------------------------------------------------------

pub const BOSS_SPAWN_INTERVAL_MS: f64 = 2500.0;
pub const BOSS_BASE_WORDS: usize = 3;
pub const BOSS_MAX_WORDS: usize = 8;
pub const BOSS_BASE_HEALTH: u32 = 5;
pub const BOSS_HEALTH_PER_LEVEL: u32 = 2;
pub const BOSS_TIMER_MS: f64 = 30_000.0;
pub const BOSS_TIMER_TICK_MS: f64 = 100.0;
pub const BOSS_SCORE_PER_CHAR: u64 = 5;
pub const BOSS_Y: f64 = 120.0;
pub const PROJECTILE_MAX_VX: f64 = 3.0;

// --- Scoring ----------------------------------------------------------------

pub const POSITION_ZONES: u32 = 20;
pub const COMBO_BONUS_FACTOR: f64 = 0.1;
pub const TIMING_WINDOW_MS: f64 = 3000.0;
pub const TIMING_MAX_MULTIPLIER: f64 = 2.0;
pub const SCORE_BOOST_MULTIPLIER: f64 = 2.0;

// --- Power-ups --------------------------------------------------------------

pub const SLOW_TIME_FACTOR: f64 = 0.4;
pub const SLOW_TIME_DURATION_MS: f64 = 7000.0;
pub const SCORE_MULTIPLIER_DURATION_MS: f64 = 10_000.0;
pub const FRENZY_DURATION_MS: f64 = 8000.0;
pub const FRENZY_RADIUS: f64 = 150.0;
pub const FRENZY_COLLATERAL_FACTOR: f64 = 0.5;
pub const UNIFY_WORD_COUNT: usize = 10;

pub const THRESHOLD_SLOW_TIME: u32 = 15;
pub const THRESHOLD_CLEAR_WORDS: u32 = 25;
pub const THRESHOLD_SHIELD: u32 = 20;
pub const THRESHOLD_SCORE_MULTIPLIER: u32 = 20;
pub const THRESHOLD_UNIFY: u32 = 30;
pub const THRESHOLD_FRENZY: u32 = 25;

// --- Leaderboard ------------------------------------------------------------

pub const LEADERBOARD_MAX_SIZE: usize = 10;

// --- Settings ---------------------------------------------------------------

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Result<Self, GameError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }

    /// Preset settings for this difficulty.
    pub fn preset(self) -> GameSettings {
        match self {
            Difficulty::Easy => GameSettings {
                difficulty: self,
                starting_lives: 5,
                fall_speed_start: 0.4,
                spawn_rate_start: 2200.0,
                hardcore_mode: false,
            },
            Difficulty::Medium => GameSettings {
                difficulty: self,
                starting_lives: INITIAL_LIVES,
                fall_speed_start: WORD_FALL_SPEED_START,
                spawn_rate_start: WORD_SPAWN_RATE_START,
                hardcore_mode: false,
            },
            Difficulty::Hard => GameSettings {
                difficulty: self,
                starting_lives: 2,
                fall_speed_start: 0.7,
                spawn_rate_start: 1400.0,
                hardcore_mode: false,
            },
        }
    }
}

/// Inclusive range for a user-tunable setting.
#[derive(Clone, Copy, Debug)]
pub struct SettingRange<T> {
    pub min: T,
    pub max: T,
    pub step: T,
}

pub struct CustomSettingsRanges {
    pub lives: SettingRange<i32>,
    pub fall_speed: SettingRange<f64>,
    pub spawn_rate: SettingRange<f64>,
}

pub const CUSTOM_SETTINGS_RANGES: CustomSettingsRanges = CustomSettingsRanges {
    lives: SettingRange { min: 1, max: 10, step: 1 },
    fall_speed: SettingRange { min: 0.2, max: 2.0, step: 0.1 },
    spawn_rate: SettingRange { min: 500.0, max: 4000.0, step: 100.0 },
};

/// Difficulty-derived settings for one playthrough.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub starting_lives: i32,
    pub fall_speed_start: f64,
    pub spawn_rate_start: f64,
    pub hardcore_mode: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Difficulty::Medium.preset()
    }
}

impl GameSettings {
    /// Reject custom values outside `CUSTOM_SETTINGS_RANGES`.
    pub fn validate(&self) -> Result<(), GameError> {
        let r = &CUSTOM_SETTINGS_RANGES;
        if !(r.lives.min..=r.lives.max).contains(&self.starting_lives) {
            return Err(GameError::InvalidSetting {
                name: "startingLives",
                value: self.starting_lives as f64,
            });
        }
        if !(r.fall_speed.min..=r.fall_speed.max).contains(&self.fall_speed_start) {
            return Err(GameError::InvalidSetting {
                name: "fallSpeedStart",
                value: self.fall_speed_start,
            });
        }
        if !(r.spawn_rate.min..=r.spawn_rate.max).contains(&self.spawn_rate_start) {
            return Err(GameError::InvalidSetting {
                name: "spawnRateStart",
                value: self.spawn_rate_start,
            });
        }
        Ok(())
    }

    pub fn base_fall_speed(&self, level: u32) -> f64 {
        self.fall_speed_start + (level.saturating_sub(1)) as f64 * WORD_FALL_SPEED_INCREASE
    }

    pub fn regular_spawn_interval(&self, level: u32) -> f64 {
        (self.spawn_rate_start - (level.saturating_sub(1)) as f64 * WORD_SPAWN_RATE_DECREASE)
            .max(MIN_SPAWN_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for d in Difficulty::ALL {
            assert!(d.preset().validate().is_ok(), "{} preset out of range", d.name());
        }
    }

    #[test]
    fn out_of_range_lives_rejected() {
        let mut s = GameSettings::default();
        s.starting_lives = 0;
        assert!(matches!(
            s.validate(),
            Err(GameError::InvalidSetting { name: "startingLives", .. })
        ));
    }

    #[test]
    fn spawn_interval_floors_at_minimum() {
        let s = GameSettings::default();
        assert_eq!(s.regular_spawn_interval(1), 1800.0);
        assert_eq!(s.regular_spawn_interval(3), 1600.0);
        assert_eq!(s.regular_spawn_interval(100), MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn fall_speed_grows_per_level() {
        let s = GameSettings::default();
        assert!((s.base_fall_speed(1) - 0.5).abs() < 1e-9);
        assert!((s.base_fall_speed(4) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse("HARD").ok(), Some(Difficulty::Hard));
        assert!(Difficulty::parse("nightmare").is_err());
    }
}
