//! Static word datasets and the `WordBank` the spawner draws from.
//!
//! All entries are lowercase ASCII; matching is case-insensitive anyway.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::config::{Difficulty, WAVE_WORD_MAX_LEN, WAVE_WORD_MIN_LEN};

pub const EASY_WORDS: &[&str] = &[
    "cat", "dog", "sun", "run", "hat", "cup", "pen", "box", "red", "map",
    "fish", "bird", "tree", "rain", "star", "moon", "book", "cake", "door", "lamp",
    "milk", "ship", "frog", "kite", "ring", "sock", "bell", "leaf", "nest", "rock",
    "apple", "house", "water", "green", "light", "happy", "chair", "bread", "cloud", "smile",
];

pub const MEDIUM_WORDS: &[&str] = &[
    "planet", "garden", "window", "silver", "rocket", "travel", "forest", "bridge",
    "castle", "thunder", "journey", "morning", "whisper", "kitchen", "lantern", "harvest",
    "pencil", "market", "winter", "summer", "button", "candle", "mirror", "pocket",
    "shadow", "voyage", "anchor", "meadow", "spiral", "canyon", "glacier", "compass",
];

pub const HARD_WORDS: &[&str] = &[
    "algorithm", "labyrinth", "rhythm", "quarantine", "xylophone", "phenomenon",
    "kaleidoscope", "mischievous", "onomatopoeia", "juxtaposition", "bureaucracy",
    "conscientious", "silhouette", "entrepreneur", "hierarchy", "paraphernalia",
    "questionnaire", "surveillance", "acquiesce", "idiosyncrasy", "pharaoh",
    "rendezvous", "vacuum", "zephyr", "quixotic", "ephemeral", "ubiquitous",
];

/// Long words reserved for boss encounters.
pub const BOSS_WORDS: &[&str] = &[
    "hurricane", "devastation", "annihilation", "extraordinary", "metamorphosis",
    "tempestuous", "incandescent", "pandemonium", "juggernaut", "leviathan",
    "obliteration", "maelstrom", "behemoth", "apocalypse", "overwhelming",
];

/// Word list for a difficulty tier.
pub fn words_for(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => EASY_WORDS,
        Difficulty::Medium => MEDIUM_WORDS,
        Difficulty::Hard => HARD_WORDS,
    }
}

/// Candidate words for one session: the active list plus the wave pool.
#[derive(Clone, Debug, Default)]
pub struct WordBank {
    words: Vec<String>,
    wave_words: Vec<String>,
}

impl WordBank {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::from_words(words_for(difficulty).iter().map(|w| (*w).to_string()).collect())
    }

    /// Build a bank from an externally supplied list. Blank entries are dropped.
    pub fn from_words(words: Vec<String>) -> Self {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        // Wave words always come from the short end of the easy list.
        let wave_words = EASY_WORDS
            .iter()
            .filter(|w| (WAVE_WORD_MIN_LEN..=WAVE_WORD_MAX_LEN).contains(&w.len()))
            .map(|w| (*w).to_string())
            .collect();
        Self { words, wave_words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn random_word(&self, rng: &mut impl Rng) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    pub fn random_wave_word(&self, rng: &mut impl Rng) -> Option<&str> {
        self.wave_words.choose(rng).map(String::as_str)
    }
}

/// Pick `count` distinct boss words (fewer if the list is shorter).
pub fn pick_boss_words(count: usize, rng: &mut impl Rng) -> Vec<String> {
    BOSS_WORDS
        .choose_multiple(rng, count)
        .map(|w| (*w).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_bank_yields_nothing() {
        let bank = WordBank::from_words(vec!["  ".into(), String::new()]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(bank.is_empty());
        assert_eq!(bank.random_word(&mut rng), None);
        // the wave pool does not depend on the active list
        assert!(bank.random_wave_word(&mut rng).is_some());
    }

    #[test]
    fn wave_words_are_short() {
        let bank = WordBank::for_difficulty(Difficulty::Hard);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let w = bank.random_wave_word(&mut rng).unwrap_or_default();
            assert!((WAVE_WORD_MIN_LEN..=WAVE_WORD_MAX_LEN).contains(&w.len()), "{w}");
            assert!(EASY_WORDS.contains(&w));
        }
    }

    #[test]
    fn boss_words_are_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        let picked = pick_boss_words(6, &mut rng);
        assert_eq!(picked.len(), 6);
        for (i, w) in picked.iter().enumerate() {
            assert!(!picked[i + 1..].contains(w));
        }
    }
}
