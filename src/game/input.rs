//! Typed buffer, prefix feedback and exact-match resolution.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::INPUT_STATUS_REVERT_MS;
use super::powerup::PowerUpKind;
use super::word::{Word, WordCategory};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputStatus {
    #[default]
    Idle,
    Correct,
    Incorrect,
}

/// What the current buffer resolved to. Indices point into the word list
/// passed to [`InputMatcher::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchTarget {
    Boss,
    PowerUp { index: usize, kind: PowerUpKind },
    /// Regular completion. More than one index only for transformed words.
    Words(Vec<usize>),
}

#[derive(Clone, Debug, Default)]
pub struct InputMatcher {
    buffer: String,
    status: InputStatus,
    status_until: Option<f64>,
}

impl InputMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn status(&self) -> InputStatus {
        self.status
    }

    /// Replace the buffer. Returns true when the new text is a mistyped prefix,
    /// i.e. the buffer grew and nothing on screen starts with it.
    pub fn on_input_change(
        &mut self,
        text: &str,
        words: &[Word],
        boss_word: Option<&str>,
        now: f64,
    ) -> bool {
        let grew = text.chars().count() > self.buffer.chars().count();
        self.buffer = text.to_string();
        let typed = normalize(text);
        if !grew || typed.is_empty() {
            self.set_status(InputStatus::Idle, None);
            return false;
        }
        let boss_hit = boss_word.is_some_and(|b| b.to_lowercase().starts_with(&typed));
        let correct = boss_hit || words.iter().any(|w| w.is_falling() && w.starts_with(&typed));
        let status = if correct { InputStatus::Correct } else { InputStatus::Incorrect };
        self.set_status(status, Some(now + INPUT_STATUS_REVERT_MS));
        !correct
    }

    /// Exact-match lookup. The boss word wins over same-text falling words;
    /// among duplicates the lowest word on screen is taken.
    pub fn resolve(&self, words: &[Word], boss_word: Option<&str>) -> Option<MatchTarget> {
        let typed = self.buffer.trim();
        if typed.is_empty() {
            return None;
        }
        if boss_word.is_some_and(|b| !b.is_empty() && b.eq_ignore_ascii_case(typed)) {
            return Some(MatchTarget::Boss);
        }
        let (index, word) = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_falling() && w.matches(typed))
            .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y))?;
        match word.category {
            WordCategory::PowerUp(kind) => Some(MatchTarget::PowerUp { index, kind }),
            WordCategory::Transformed => Some(MatchTarget::Words(
                words
                    .iter()
                    .enumerate()
                    .filter(|(_, w)| {
                        w.is_falling() && w.category == WordCategory::Transformed && w.matches(typed)
                    })
                    .map(|(i, _)| i)
                    .collect(),
            )),
            _ => Some(MatchTarget::Words(vec![index])),
        }
    }

    /// Revert the feedback indicator once its timer ran out.
    pub fn tick(&mut self, now: f64) {
        if self.status_until.is_some_and(|t| now >= t) {
            self.set_status(InputStatus::Idle, None);
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.set_status(InputStatus::Idle, None);
    }

    pub fn shift(&mut self, delta: f64) {
        if let Some(t) = self.status_until.as_mut() {
            *t += delta;
        }
    }

    fn set_status(&mut self, status: InputStatus, until: Option<f64>) {
        self.status = status;
        self.status_until = until;
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
