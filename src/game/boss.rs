//! Boss encounter state: ordered words, health and the countdown timer.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::*;
use super::word::{Word, WordCategory, WordId};
use crate::words::pick_boss_words;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq)]
pub struct BossState {
    pub words: Vec<String>,
    pub current_word_index: usize,
    pub health: u32,
    pub max_health: u32,
    pub timer: f64,
    pub max_timer: f64,
    /// Real time not yet converted into whole timer ticks.
    #[cfg_attr(feature = "serde", serde(skip))]
    tick_accumulator: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BossHit {
    pub word_len: usize,
    pub defeated: bool,
}

impl BossState {
    /// Word count and health both scale with the level.
    pub fn spawn(level: u32, rng: &mut impl Rng) -> Self {
        let count = (BOSS_BASE_WORDS + level.saturating_sub(1) as usize).min(BOSS_MAX_WORDS);
        let health = BOSS_BASE_HEALTH + level.saturating_sub(1) * BOSS_HEALTH_PER_LEVEL;
        Self::with_words(pick_boss_words(count, rng), health)
    }

    pub fn with_words(words: Vec<String>, health: u32) -> Self {
        Self {
            words,
            current_word_index: 0,
            health,
            max_health: health,
            timer: BOSS_TIMER_MS,
            max_timer: BOSS_TIMER_MS,
            tick_accumulator: 0.0,
        }
    }

    /// Current target; wraps around the word list.
    pub fn current_word(&self) -> &str {
        if self.words.is_empty() {
            return "";
        }
        &self.words[self.current_word_index % self.words.len()]
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    pub fn hit(&mut self) -> BossHit {
        let word_len = self.current_word().chars().count();
        if !self.words.is_empty() {
            self.current_word_index = (self.current_word_index + 1) % self.words.len();
        }
        self.health = self.health.saturating_sub(1);
        BossHit { word_len, defeated: self.is_defeated() }
    }

    /// Count the timer down in fixed ticks, each scaled by `slow_factor`.
    /// Returns true once the timer has run out.
    pub fn advance_timer(&mut self, elapsed_ms: f64, slow_factor: f64) -> bool {
        self.tick_accumulator += elapsed_ms.max(0.0);
        while self.tick_accumulator >= BOSS_TIMER_TICK_MS {
            self.tick_accumulator -= BOSS_TIMER_TICK_MS;
            self.timer = (self.timer - BOSS_TIMER_TICK_MS * slow_factor).max(0.0);
        }
        self.timer <= 0.0
    }
}

/// Single-letter projectile launched from the boss after a hit.
pub fn fire_projectile(id: WordId, field_width: f64, rng: &mut impl Rng) -> Word {
    let letter = char::from(rng.gen_range(b'a'..=b'z'));
    let mut word = Word::new(id, letter.to_string(), field_width / 2.0, BOSS_Y, WordCategory::Projectile);
    word.vx = rng.gen_range(-PROJECTILE_MAX_VX..=PROJECTILE_MAX_VX);
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn boss_scales_with_level() {
        let mut rng = StdRng::seed_from_u64(5);
        let b1 = BossState::spawn(1, &mut rng);
        let b3 = BossState::spawn(3, &mut rng);
        assert_eq!(b1.words.len(), BOSS_BASE_WORDS);
        assert_eq!(b3.words.len(), BOSS_BASE_WORDS + 2);
        assert_eq!(b1.health, BOSS_BASE_HEALTH);
        assert_eq!(b3.max_health, BOSS_BASE_HEALTH + 2 * BOSS_HEALTH_PER_LEVEL);
        let big = BossState::spawn(50, &mut rng);
        assert_eq!(big.words.len(), BOSS_MAX_WORDS);
    }

    #[test]
    fn word_index_wraps() {
        let mut boss = BossState::with_words(vec!["alpha".into(), "beta".into()], 5);
        assert_eq!(boss.current_word(), "alpha");
        boss.hit();
        assert_eq!(boss.current_word(), "beta");
        boss.hit();
        assert_eq!(boss.current_word(), "alpha");
        assert_eq!(boss.health, 3);
    }

    #[test]
    fn defeat_at_zero_health() {
        let mut boss = BossState::with_words(vec!["alpha".into()], 2);
        assert!(!boss.hit().defeated);
        let hit = boss.hit();
        assert!(hit.defeated);
        assert_eq!(hit.word_len, 5);
        // further hits stay at zero
        boss.hit();
        assert_eq!(boss.health, 0);
    }

    #[test]
    fn empty_word_list_is_safe() {
        let mut boss = BossState::with_words(Vec::new(), 1);
        assert_eq!(boss.current_word(), "");
        assert!(boss.hit().defeated);
    }

    #[test]
    fn timer_ticks_slower_under_slow_time() {
        let mut normal = BossState::with_words(vec!["x".into()], 1);
        let mut slowed = normal.clone();
        normal.advance_timer(1000.0, 1.0);
        slowed.advance_timer(1000.0, SLOW_TIME_FACTOR);
        assert!((normal.timer - (BOSS_TIMER_MS - 1000.0)).abs() < 1e-6);
        assert!((slowed.timer - (BOSS_TIMER_MS - 400.0)).abs() < 1e-6);
    }

    #[test]
    fn timer_counts_in_whole_ticks() {
        let mut boss = BossState::with_words(vec!["x".into()], 1);
        boss.advance_timer(50.0, 1.0);
        assert_eq!(boss.timer, BOSS_TIMER_MS);
        boss.advance_timer(50.0, 1.0);
        assert_eq!(boss.timer, BOSS_TIMER_MS - BOSS_TIMER_TICK_MS);
        assert!(boss.advance_timer(BOSS_TIMER_MS, 1.0));
        assert_eq!(boss.timer, 0.0);
    }

    #[test]
    fn projectile_is_single_letter() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = fire_projectile(9, 800.0, &mut rng);
        assert_eq!(p.text.len(), 1);
        assert_eq!(p.category, WordCategory::Projectile);
        assert!(p.vx.abs() <= PROJECTILE_MAX_VX);
    }
}
