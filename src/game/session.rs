//! `GameSession`: the counters of one playthrough, mutated through methods only.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::*;
use super::powerup::{ActivePowerUp, PowerUpKind, PowerUpMeters};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
    S,
}

impl Grade {
    /// Grade from WPM weighted by accuracy.
    pub fn from_performance(wpm: f64, accuracy: f64) -> Self {
        let effective = wpm * accuracy / 100.0;
        match effective {
            e if e >= 70.0 => Grade::S,
            e if e >= 55.0 => Grade::A,
            e if e >= 40.0 => Grade::B,
            e if e >= 28.0 => Grade::C,
            e if e >= 15.0 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::F => "F",
            Grade::D => "D",
            Grade::C => "C",
            Grade::B => "B",
            Grade::A => "A",
            Grade::S => "S",
        }
    }
}

/// Computed once at game over.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinalStats {
    pub score: u64,
    pub level: u32,
    pub wpm: f64,
    pub accuracy: f64,
    pub grade: Grade,
    pub longest_combo: u32,
    pub words_cleared: u32,
}

/// Outcome of one miss-detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissOutcome {
    pub missed: u32,
    pub shield_used: bool,
    pub lives_lost: u32,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    pub(crate) settings: GameSettings,
    pub(crate) score: u64,
    pub(crate) lives: i32,
    pub(crate) level: u32,
    pub(crate) combo: u32,
    pub(crate) longest_combo: u32,
    pub(crate) words_cleared_this_level: u32,
    pub(crate) total_words_cleared: u32,
    pub(crate) total_chars_completed: u32,
    pub(crate) total_mistypes: u32,
    pub(crate) last_completion_time: Option<f64>,
    pub(crate) shield: bool,
    pub(crate) meters: PowerUpMeters,
    pub(crate) active_power_ups: Vec<ActivePowerUp>,
    pub(crate) start_time: f64,
    pub(crate) paused_ms: f64,
    game_over: bool,
    final_stats: Option<FinalStats>,
}

impl GameSession {
    pub fn new(settings: GameSettings, now: f64) -> Self {
        Self {
            settings,
            score: 0,
            lives: settings.starting_lives.max(1),
            level: 1,
            combo: 0,
            longest_combo: 0,
            words_cleared_this_level: 0,
            total_words_cleared: 0,
            total_chars_completed: 0,
            total_mistypes: 0,
            last_completion_time: None,
            shield: false,
            meters: PowerUpMeters::default(),
            active_power_ups: Vec::new(),
            start_time: now,
            paused_ms: 0.0,
            game_over: false,
            final_stats: None,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn longest_combo(&self) -> u32 {
        self.longest_combo
    }

    pub fn words_cleared_this_level(&self) -> u32 {
        self.words_cleared_this_level
    }

    pub fn total_words_cleared(&self) -> u32 {
        self.total_words_cleared
    }

    pub fn total_chars_completed(&self) -> u32 {
        self.total_chars_completed
    }

    pub fn total_mistypes(&self) -> u32 {
        self.total_mistypes
    }

    /// Start of the timing window for the next completion.
    pub fn last_completion_time(&self) -> Option<f64> {
        self.last_completion_time
    }

    pub fn shield(&self) -> bool {
        self.shield
    }

    pub fn meters(&self) -> &PowerUpMeters {
        &self.meters
    }

    pub fn active_power_ups(&self) -> &[ActivePowerUp] {
        &self.active_power_ups
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Total time spent paused; excluded from WPM.
    pub fn paused_ms(&self) -> f64 {
        self.paused_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.final_stats.as_ref()
    }

    // --- Power-up state ---

    pub fn is_active(&self, kind: PowerUpKind, now: f64) -> bool {
        self.active_power_ups
            .iter()
            .any(|p| p.kind == kind && now <= p.expiration)
    }

    pub fn slow_factor(&self, now: f64) -> f64 {
        if self.is_active(PowerUpKind::SlowTime, now) { SLOW_TIME_FACTOR } else { 1.0 }
    }

    pub fn score_boost(&self, now: f64) -> f64 {
        if self.is_active(PowerUpKind::ScoreMultiplier, now) { SCORE_BOOST_MULTIPLIER } else { 1.0 }
    }

    /// Start a timed effect. Instant kinds are ignored.
    pub(crate) fn start_timed(&mut self, kind: PowerUpKind, now: f64) {
        if let Some(duration) = kind.duration() {
            self.active_power_ups.push(ActivePowerUp { kind, expiration: now + duration });
        }
    }

    pub(crate) fn raise_shield(&mut self) {
        self.shield = true;
    }

    /// Consume a ready meter; false when it was not ready.
    pub(crate) fn consume_meter(&mut self, kind: PowerUpKind) -> bool {
        self.meters.get_mut(kind).consume()
    }

    /// Move every session deadline forward after a pause.
    pub(crate) fn shift_deadlines(&mut self, delta: f64) {
        self.paused_ms += delta;
        for p in &mut self.active_power_ups {
            p.expiration += delta;
        }
        if let Some(t) = self.last_completion_time.as_mut() {
            *t += delta;
        }
    }

    /// Lazily drop entries whose expiration has passed.
    pub fn expire_power_ups(&mut self, now: f64) {
        self.active_power_ups.retain(|p| now <= p.expiration);
    }

    // --- Misses / lives ---

    /// Charge `missed` words against the session. The shield absorbs exactly one
    /// life loss; combo and the timing chain reset on any miss, shielded or not.
    pub fn apply_misses(&mut self, missed: u32) -> MissOutcome {
        if missed == 0 {
            return MissOutcome::default();
        }
        let mut cost = missed;
        let shield_used = self.shield;
        if shield_used {
            self.shield = false;
            cost -= 1;
        }
        self.lose_lives(cost);
        self.combo = 0;
        self.last_completion_time = None;
        MissOutcome { missed, shield_used, lives_lost: cost }
    }

    pub(crate) fn break_combo(&mut self) {
        self.combo = 0;
    }

    pub fn lose_lives(&mut self, n: u32) {
        self.lives = (self.lives - n as i32).max(0);
    }

    /// Mistyped prefix; hardcore mode also breaks the combo.
    pub fn register_mistype(&mut self) {
        self.total_mistypes += 1;
        if self.settings.hardcore_mode {
            self.combo = 0;
        }
    }

    /// Edge-triggered: true only on the call that ends the game.
    pub fn check_game_over(&mut self, now: f64) -> bool {
        if self.game_over || self.lives > 0 {
            return false;
        }
        self.game_over = true;
        self.final_stats = Some(self.compute_stats(now));
        true
    }

    // --- Progress ---

    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn bump_combo(&mut self) {
        self.combo += 1;
        self.longest_combo = self.longest_combo.max(self.combo);
    }

    pub fn record_clear(&mut self, chars: usize, counts_for_level: bool) {
        self.total_words_cleared += 1;
        self.total_chars_completed += chars as u32;
        if counts_for_level {
            self.words_cleared_this_level += 1;
        }
    }

    /// Score-threshold level up; returns true if the level changed.
    pub fn check_score_level_up(&mut self) -> bool {
        if self.score > 0 && self.score >= self.level as u64 * LEVEL_UP_SCORE {
            self.level += 1;
            return true;
        }
        false
    }

    /// Progress toward the next wave starts over.
    pub(crate) fn reset_level_progress(&mut self) {
        self.words_cleared_this_level = 0;
    }

    pub(crate) fn mark_completion(&mut self, now: f64) {
        self.last_completion_time = Some(now);
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
        self.words_cleared_this_level = 0;
    }

    fn compute_stats(&self, now: f64) -> FinalStats {
        let minutes = ((now - self.start_time - self.paused_ms) / 60_000.0).max(0.0);
        let wpm = if minutes > 0.0 {
            (self.total_chars_completed as f64 / 5.0) / minutes
        } else {
            0.0
        };
        let typed = self.total_chars_completed + self.total_mistypes;
        let accuracy = if typed == 0 {
            100.0
        } else {
            self.total_chars_completed as f64 / typed as f64 * 100.0
        };
        FinalStats {
            score: self.score,
            level: self.level,
            wpm,
            accuracy,
            grade: Grade::from_performance(wpm, accuracy),
            longest_combo: self.longest_combo,
            words_cleared: self.total_words_cleared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(GameSettings::default(), 0.0)
    }

    #[test]
    fn zero_misses_change_nothing() {
        let mut s = session();
        s.combo = 4;
        s.shield = true;
        s.last_completion_time = Some(10.0);
        assert_eq!(s.apply_misses(0), MissOutcome::default());
        assert_eq!((s.lives, s.combo, s.shield), (3, 4, true));
        assert_eq!(s.last_completion_time, Some(10.0));
    }

    #[test]
    fn shield_absorbs_exactly_one_miss() {
        let mut s = session();
        s.shield = true;
        let out = s.apply_misses(2);
        assert_eq!(out, MissOutcome { missed: 2, shield_used: true, lives_lost: 1 });
        assert_eq!(s.lives, 2);
        assert!(!s.shield);
    }

    #[test]
    fn lives_never_go_negative() {
        let mut s = session();
        s.apply_misses(7);
        assert_eq!(s.lives, 0);
    }

    #[test]
    fn game_over_fires_once() {
        let mut s = session();
        s.apply_misses(3);
        assert!(s.check_game_over(60_000.0));
        assert!(!s.check_game_over(61_000.0));
        assert!(s.is_game_over());
        assert!(s.final_stats().is_some());
    }

    #[test]
    fn hardcore_mistype_breaks_combo() {
        let mut s = session();
        s.combo = 3;
        s.register_mistype();
        assert_eq!((s.combo, s.total_mistypes), (3, 1));
        s.settings.hardcore_mode = true;
        s.register_mistype();
        assert_eq!((s.combo, s.total_mistypes), (0, 2));
    }

    #[test]
    fn stats_exclude_paused_time() {
        let mut s = session();
        s.total_chars_completed = 250;
        s.total_mistypes = 0;
        s.paused_ms = 60_000.0;
        s.lives = 0;
        s.check_game_over(120_000.0);
        let stats = *s.final_stats().expect("final stats computed");
        assert!((stats.wpm - 50.0).abs() < 1e-9);
        assert_eq!(stats.accuracy, 100.0);
        assert_eq!(stats.grade, Grade::B);
    }

    #[test]
    fn deadlines_shift_together() {
        let mut s = session();
        s.start_timed(PowerUpKind::ScoreMultiplier, 1000.0);
        s.start_timed(PowerUpKind::Shield, 1000.0);
        s.mark_completion(1200.0);
        s.shift_deadlines(500.0);
        assert_eq!(s.active_power_ups().len(), 1);
        assert_eq!(s.active_power_ups()[0].expiration, 1500.0 + SCORE_MULTIPLIER_DURATION_MS);
        assert_eq!(s.last_completion_time(), Some(1700.0));
        assert_eq!(s.paused_ms(), 500.0);
    }

    #[test]
    fn hotkey_meter_consumed_once() {
        let mut s = session();
        assert!(!s.consume_meter(PowerUpKind::Shield));
        s.meters.get_mut(PowerUpKind::Shield).advance(THRESHOLD_SHIELD);
        assert!(s.meters().get(PowerUpKind::Shield).is_ready());
        assert!(s.consume_meter(PowerUpKind::Shield));
        assert_eq!(s.meters().get(PowerUpKind::Shield).progress(), 0);
        assert!(!s.consume_meter(PowerUpKind::Shield));
    }

    #[test]
    fn expired_power_ups_are_filtered() {
        let mut s = session();
        s.active_power_ups.push(ActivePowerUp { kind: PowerUpKind::SlowTime, expiration: 100.0 });
        assert_eq!(s.slow_factor(100.0), SLOW_TIME_FACTOR);
        s.expire_power_ups(100.5);
        assert!(s.active_power_ups.is_empty());
        assert_eq!(s.slow_factor(100.5), 1.0);
    }
}
