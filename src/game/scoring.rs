//! Point computation for completed words.
//!
//! Canonical order: the position and combo bonuses are added to the base
//! length first, then the timing multiplier and the score boost apply to
//! that sum, and the result is rounded once.
//!
//! `points = round((base + position + combo) * timing * boost)`

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::*;
use super::powerup::PowerUpKind;
use super::session::GameSession;
use super::word::{Word, WordCategory};

/// Feedback label for rapid completions. Not used in the computation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingTier {
    Unreal,
    Perfect,
    Great,
    Good,
}

impl TimingTier {
    pub fn for_elapsed(elapsed_ms: f64) -> Option<Self> {
        match elapsed_ms {
            e if e < 0.0 => None,
            e if e < 500.0 => Some(TimingTier::Unreal),
            e if e < 1000.0 => Some(TimingTier::Perfect),
            e if e < 2000.0 => Some(TimingTier::Great),
            e if e < TIMING_WINDOW_MS => Some(TimingTier::Good),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimingTier::Unreal => "UNREAL",
            TimingTier::Perfect => "PERFECT",
            TimingTier::Great => "GREAT",
            TimingTier::Good => "GOOD",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingBonus {
    pub multiplier: f64,
    pub tier: Option<TimingTier>,
}

impl TimingBonus {
    pub const NONE: TimingBonus = TimingBonus { multiplier: 1.0, tier: None };

    /// Linear decay from `TIMING_MAX_MULTIPLIER` at 0 ms to 1.0 at the window edge.
    pub fn from_elapsed(elapsed_ms: Option<f64>) -> Self {
        let Some(elapsed) = elapsed_ms else {
            return Self::NONE;
        };
        if !(0.0..TIMING_WINDOW_MS).contains(&elapsed) {
            return Self::NONE;
        }
        let remaining = (TIMING_WINDOW_MS - elapsed) / TIMING_WINDOW_MS;
        let multiplier = (1.0 + remaining * (TIMING_MAX_MULTIPLIER - 1.0)).min(TIMING_MAX_MULTIPLIER);
        TimingBonus { multiplier, tier: TimingTier::for_elapsed(elapsed) }
    }
}

/// Zone-based multiplier: top zone 1.0, bottom zone 0.0.
pub fn position_bonus_multiplier(y: f64, field_height: f64) -> f64 {
    if field_height <= 0.0 {
        return 0.0;
    }
    let last = (POSITION_ZONES - 1) as f64;
    let zone_height = field_height / POSITION_ZONES as f64;
    let zone = (y / zone_height).floor().clamp(0.0, last);
    (last - zone) / last
}

/// Breakdown of one word's award.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordScore {
    pub base: u64,
    pub position_bonus: u64,
    pub combo_bonus: u64,
    pub timing: TimingBonus,
    pub score_multiplier: f64,
    pub points: u64,
}

impl WordScore {
    /// Points added by the multiplicative factors over the plain sum.
    pub fn multiplier_bonus(&self) -> u64 {
        self.points
            .saturating_sub(self.base + self.position_bonus + self.combo_bonus)
    }
}

pub fn score_word(
    text_len: usize,
    y: f64,
    field_height: f64,
    combo: u32,
    timing: TimingBonus,
    score_multiplier: f64,
) -> WordScore {
    let base = text_len as f64;
    let position_bonus = (base * position_bonus_multiplier(y, field_height)).ceil();
    let combo_bonus = (base * combo as f64 * COMBO_BONUS_FACTOR).round();
    let points =
        ((base + position_bonus + combo_bonus) * timing.multiplier * score_multiplier).round();
    WordScore {
        base: text_len as u64,
        position_bonus: position_bonus as u64,
        combo_bonus: combo_bonus as u64,
        timing,
        score_multiplier,
        points: points as u64,
    }
}

pub fn boss_hit_points(word_len: usize, score_multiplier: f64) -> u64 {
    ((word_len as u64 * BOSS_SCORE_PER_CHAR) as f64 * score_multiplier).round() as u64
}

/// Reduced award for a word caught in a frenzy blast.
pub fn collateral_points(word_len: usize, score_multiplier: f64) -> u64 {
    (word_len as f64 * FRENZY_COLLATERAL_FACTOR * score_multiplier).round() as u64
}

/// A scored word ready for presentation.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingScore {
    pub id: u64,
    pub base: u64,
    pub bonus: u64,
    pub timing_bonus: u64,
    pub timing_label: Option<&'static str>,
    pub timing_multiplier: Option<f64>,
    pub score_multiplier: Option<f64>,
    pub x: f64,
    pub y: f64,
    pub created_at: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Completion {
    pub points_awarded: u64,
    pub combo_after: u32,
    pub scores: Vec<(f64, f64, WordScore)>,
    /// Meters that filled up with this batch.
    pub ready: Vec<PowerUpKind>,
}

/// Score a batch of regular words matched together and apply the session
/// side effects: counters, combo, timing chain and meter progress.
pub fn complete_words(
    session: &mut GameSession,
    matched: &[Word],
    field_height: f64,
    in_boss: bool,
    now: f64,
) -> Completion {
    let mut completion = Completion::default();
    if matched.is_empty() {
        completion.combo_after = session.combo;
        return completion;
    }
    let elapsed = session.last_completion_time.map(|t| now - t);
    let timing = TimingBonus::from_elapsed(elapsed);
    let boost = session.score_boost(now);

    for word in matched {
        let len = word.text.chars().count();
        let score = score_word(len, word.y, field_height, session.combo, timing, boost);
        session.add_points(score.points);
        session.record_clear(len, !in_boss && word.category != WordCategory::Wave);
        session.bump_combo();
        completion.points_awarded += score.points;
        let (cx, cy) = word.center();
        completion.scores.push((cx, cy, score));
    }
    session.mark_completion(now);
    completion.ready = session.meters.advance_all(matched.len() as u32);
    completion.combo_after = session.combo;
    completion
}
