//! Decides what to spawn and where. Callers throttle how often.

use rand::Rng;
use rand::seq::SliceRandom;

use super::config::*;
use super::powerup::PowerUpKind;
use super::word::{Word, WordCategory, WordId, estimated_width};
use crate::words::WordBank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    /// Random bank word, occasionally replaced by a power-up word.
    Regular,
    Wave,
    PowerUp(PowerUpKind),
}

#[derive(Clone, Debug)]
pub struct Spawner {
    next_id: WordId,
}

impl Default for Spawner {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh id, unique within the session.
    pub fn next_id(&mut self) -> WordId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Build one word; `None` when the relevant word list is empty.
    pub fn spawn(
        &mut self,
        kind: SpawnKind,
        bank: &WordBank,
        existing: &[Word],
        field_width: f64,
        rng: &mut impl Rng,
    ) -> Option<Word> {
        if kind == SpawnKind::Regular && bank.is_empty() {
            return None;
        }
        let kind = match kind {
            SpawnKind::Regular if rng.gen_bool(POWERUP_SPAWN_CHANCE) => PowerUpKind::ALL
                .choose(rng)
                .map_or(SpawnKind::Regular, |k| SpawnKind::PowerUp(*k)),
            other => other,
        };
        let (text, category) = match kind {
            SpawnKind::Regular => (bank.random_word(rng)?.to_string(), WordCategory::Plain),
            SpawnKind::Wave => (bank.random_wave_word(rng)?.to_string(), WordCategory::Wave),
            SpawnKind::PowerUp(k) => (k.label().to_string(), WordCategory::PowerUp(k)),
        };
        let x = place_x(estimated_width(&text), field_width, existing, rng);
        Some(Word::new(self.next_id(), text, x, SPAWN_Y, category))
    }
}

/// Pick a horizontal position avoiding words still near the top. Best effort:
/// after the attempt budget the last candidate is used even if it overlaps.
pub fn place_x(width: f64, field_width: f64, existing: &[Word], rng: &mut impl Rng) -> f64 {
    let max_x = (field_width - width).max(0.0);
    let mut x = 0.0;
    for _ in 0..SPAWN_PLACEMENT_ATTEMPTS {
        x = if max_x > 0.0 { rng.gen_range(0.0..=max_x) } else { 0.0 };
        let overlaps = existing
            .iter()
            .filter(|w| w.y < SPAWN_TOP_BAND)
            .any(|w| x < w.x + w.pixel_width() && w.x < x + width);
        if !overlaps {
            break;
        }
    }
    x
}
