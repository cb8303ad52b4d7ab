//! Power-up kinds, meters, active timers and the activation dispatch table.

use rand::{Rng, RngCore};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::*;
use super::session::GameSession;
use super::word::{Word, WordCategory};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    SlowTime,
    ClearWords,
    Shield,
    ScoreMultiplier,
    Unify,
    Frenzy,
}

impl PowerUpKind {
    /// Hotkey order: `1`..`6`.
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::SlowTime,
        PowerUpKind::ClearWords,
        PowerUpKind::Shield,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::Unify,
        PowerUpKind::Frenzy,
    ];

    pub fn index(self) -> usize {
        match self {
            PowerUpKind::SlowTime => 0,
            PowerUpKind::ClearWords => 1,
            PowerUpKind::Shield => 2,
            PowerUpKind::ScoreMultiplier => 3,
            PowerUpKind::Unify => 4,
            PowerUpKind::Frenzy => 5,
        }
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        let n = key.to_digit(10)? as usize;
        (1..=Self::ALL.len()).contains(&n).then(|| Self::ALL[n - 1])
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::SlowTime => "slow-time",
            PowerUpKind::ClearWords => "clear-words",
            PowerUpKind::Shield => "shield",
            PowerUpKind::ScoreMultiplier => "score-multiplier",
            PowerUpKind::Unify => "unify",
            PowerUpKind::Frenzy => "frenzy",
        }
    }

    /// Text shown (and typed) for a spawned power-up word.
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::SlowTime => "SLOWMO",
            PowerUpKind::ClearWords => "WIPE",
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::ScoreMultiplier => "BOOST",
            PowerUpKind::Unify => "UNIFY",
            PowerUpKind::Frenzy => "FRENZY",
        }
    }

    pub fn threshold(self) -> u32 {
        match self {
            PowerUpKind::SlowTime => THRESHOLD_SLOW_TIME,
            PowerUpKind::ClearWords => THRESHOLD_CLEAR_WORDS,
            PowerUpKind::Shield => THRESHOLD_SHIELD,
            PowerUpKind::ScoreMultiplier => THRESHOLD_SCORE_MULTIPLIER,
            PowerUpKind::Unify => THRESHOLD_UNIFY,
            PowerUpKind::Frenzy => THRESHOLD_FRENZY,
        }
    }

    /// Duration for timed kinds; instant kinds have none.
    pub fn duration(self) -> Option<f64> {
        match self {
            PowerUpKind::SlowTime => Some(SLOW_TIME_DURATION_MS),
            PowerUpKind::ScoreMultiplier => Some(SCORE_MULTIPLIER_DURATION_MS),
            PowerUpKind::Frenzy => Some(FRENZY_DURATION_MS),
            PowerUpKind::ClearWords | PowerUpKind::Shield | PowerUpKind::Unify => None,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub expiration: f64,
}

/// Charge meter for one kind. `progress` freezes at `threshold` while `ready`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUpMeter {
    kind: PowerUpKind,
    progress: u32,
    ready: bool,
    threshold: u32,
}

impl PowerUpMeter {
    pub fn new(kind: PowerUpKind) -> Self {
        Self { kind, progress: 0, ready: false, threshold: kind.threshold() }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns true when this call made the meter ready.
    pub fn advance(&mut self, cleared: u32) -> bool {
        if self.ready || cleared == 0 {
            return false;
        }
        self.progress = (self.progress + cleared).min(self.threshold);
        self.ready = self.progress == self.threshold;
        self.ready
    }

    pub fn consume(&mut self) -> bool {
        if !self.ready {
            return false;
        }
        self.progress = 0;
        self.ready = false;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerUpMeters([PowerUpMeter; 6]);

impl Default for PowerUpMeters {
    fn default() -> Self {
        Self(PowerUpKind::ALL.map(PowerUpMeter::new))
    }
}

impl PowerUpMeters {
    pub fn get(&self, kind: PowerUpKind) -> &PowerUpMeter {
        &self.0[kind.index()]
    }

    pub(crate) fn get_mut(&mut self, kind: PowerUpKind) -> &mut PowerUpMeter {
        &mut self.0[kind.index()]
    }

    /// Advance every not-yet-ready meter; returns the kinds that became ready.
    pub(crate) fn advance_all(&mut self, cleared: u32) -> Vec<PowerUpKind> {
        self.0
            .iter_mut()
            .filter_map(|m| m.advance(cleared).then_some(m.kind))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PowerUpMeter> {
        self.0.iter()
    }
}

// --- Activation -------------------------------------------------------------

/// Everything an activation may touch.
pub struct EffectTarget<'a> {
    pub session: &'a mut GameSession,
    pub words: &'a mut Vec<Word>,
    pub rng: &'a mut dyn RngCore,
    pub now: f64,
}

/// Applies one kind's effect; returns the number of words affected.
pub type Effect = fn(&mut EffectTarget<'_>) -> usize;

/// Indexed by `PowerUpKind::index`.
const EFFECTS: [Effect; 6] = [slow_time, clear_words, shield, score_multiplier, unify, frenzy];

pub fn activate(kind: PowerUpKind, target: &mut EffectTarget<'_>) -> usize {
    let affected = EFFECTS[kind.index()](target);
    log::info!("power-up {} activated ({} words affected)", kind.name(), affected);
    affected
}

fn push_timed(target: &mut EffectTarget<'_>, kind: PowerUpKind) -> usize {
    target.session.start_timed(kind, target.now);
    0
}

fn slow_time(target: &mut EffectTarget<'_>) -> usize {
    push_timed(target, PowerUpKind::SlowTime)
}

fn score_multiplier(target: &mut EffectTarget<'_>) -> usize {
    push_timed(target, PowerUpKind::ScoreMultiplier)
}

fn frenzy(target: &mut EffectTarget<'_>) -> usize {
    push_timed(target, PowerUpKind::Frenzy)
}

fn shield(target: &mut EffectTarget<'_>) -> usize {
    target.session.raise_shield();
    0
}

fn clear_words(target: &mut EffectTarget<'_>) -> usize {
    let now = target.now;
    target
        .words
        .iter_mut()
        .filter(|w| w.is_falling() && !w.is_power_up())
        .map(|w| w.destroy(now, WIPE_EXIT_DELAY_MS))
        .filter(|destroyed| *destroyed)
        .count()
}

fn unify(target: &mut EffectTarget<'_>) -> usize {
    let mut lowest: Vec<&mut Word> = target
        .words
        .iter_mut()
        .filter(|w| {
            w.is_falling()
                && matches!(
                    w.category,
                    WordCategory::Plain | WordCategory::Wave | WordCategory::Transformed
                )
        })
        .collect();
    if lowest.is_empty() {
        return 0;
    }
    lowest.sort_by(|a, b| b.y.total_cmp(&a.y));
    lowest.truncate(UNIFY_WORD_COUNT);
    let letter = char::from(target.rng.gen_range(b'a'..=b'z')).to_string();
    for w in lowest.iter_mut() {
        w.text = letter.clone();
        w.category = WordCategory::Transformed;
    }
    lowest.len()
}
