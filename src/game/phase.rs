//! Level phase state machine.
//!
//! ```text
//! Normal -> WaveWarning -> WaveAccelerate -> WaveDeluge -> Boss -> LevelTransition -> Normal
//!                                                           \-> Normal (boss escaped)
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::*;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LevelPhase {
    #[default]
    Normal,
    WaveWarning,
    WaveAccelerate,
    WaveDeluge,
    Boss,
    LevelTransition,
}

impl LevelPhase {
    /// Phases during which words neither move nor spawn.
    pub fn freezes_simulation(self) -> bool {
        matches!(self, LevelPhase::WaveWarning | LevelPhase::LevelTransition)
    }

    pub fn is_wave(self) -> bool {
        matches!(self, LevelPhase::WaveAccelerate | LevelPhase::WaveDeluge)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: LevelPhase,
    pub to: LevelPhase,
}

/// Observations the controller needs to decide count-based transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseInputs {
    pub words_cleared_this_level: u32,
    pub wave_words_falling: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhaseController {
    phase: LevelPhase,
    entered_at: f64,
    wave_words_spawned: u32,
}

impl PhaseController {
    pub fn new(now: f64) -> Self {
        Self { phase: LevelPhase::Normal, entered_at: now, wave_words_spawned: 0 }
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// Move the phase clock forward after a pause.
    pub fn shift(&mut self, delta: f64) {
        self.entered_at += delta;
    }

    pub fn enter(&mut self, to: LevelPhase, now: f64) -> PhaseChange {
        let change = PhaseChange { from: self.phase, to };
        self.phase = to;
        self.entered_at = now;
        if to == LevelPhase::WaveDeluge {
            self.wave_words_spawned = 0;
        }
        log::info!("phase {:?} -> {:?}", change.from, change.to);
        change
    }

    /// Evaluate timer- and count-driven transitions. Boss outcomes are driven
    /// from outside through `enter`.
    pub fn evaluate(&mut self, now: f64, inputs: PhaseInputs) -> Option<PhaseChange> {
        let elapsed = now - self.entered_at;
        let next = match self.phase {
            LevelPhase::Normal
                if inputs.words_cleared_this_level >= WORDS_PER_LEVEL_UNTIL_WAVE =>
            {
                LevelPhase::WaveWarning
            }
            LevelPhase::WaveWarning if elapsed >= WAVE_WARNING_MS => LevelPhase::WaveAccelerate,
            LevelPhase::WaveAccelerate if elapsed >= WAVE_ACCELERATE_MS => LevelPhase::WaveDeluge,
            LevelPhase::WaveDeluge
                if self.deluge_quota_spawned() && inputs.wave_words_falling == 0 =>
            {
                LevelPhase::Boss
            }
            LevelPhase::LevelTransition if elapsed >= LEVEL_TRANSITION_MS => LevelPhase::Normal,
            _ => return None,
        };
        Some(self.enter(next, now))
    }

    pub fn deluge_quota_spawned(&self) -> bool {
        self.wave_words_spawned >= WAVE_DELUGE_WORD_COUNT
    }

    /// Whether the spawner may add a word in the current phase.
    pub fn may_spawn(&self) -> bool {
        match self.phase {
            LevelPhase::WaveDeluge => !self.deluge_quota_spawned(),
            p => !p.freezes_simulation(),
        }
    }

    pub fn record_wave_spawn(&mut self) {
        if self.phase == LevelPhase::WaveDeluge {
            self.wave_words_spawned += 1;
        }
    }

    pub fn speed_multiplier(&self, now: f64) -> f64 {
        match self.phase {
            LevelPhase::WaveAccelerate => {
                let t = ((now - self.entered_at) / WAVE_ACCELERATE_MS).clamp(0.0, 1.0);
                WAVE_ACCELERATE_START_MULT + (WAVE_ACCELERATE_END_MULT - WAVE_ACCELERATE_START_MULT) * t
            }
            LevelPhase::WaveDeluge => WAVE_DELUGE_MULT,
            _ => 1.0,
        }
    }

    pub fn spawn_interval(&self, settings: &GameSettings, level: u32) -> f64 {
        match self.phase {
            LevelPhase::WaveAccelerate => WAVE_ACCELERATE_SPAWN_MS,
            LevelPhase::WaveDeluge => WAVE_DELUGE_SPAWN_MS,
            LevelPhase::Boss => BOSS_SPAWN_INTERVAL_MS,
            _ => settings.regular_spawn_interval(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(cleared: u32, wave_falling: usize) -> PhaseInputs {
        PhaseInputs { words_cleared_this_level: cleared, wave_words_falling: wave_falling }
    }

    #[test]
    fn normal_waits_for_word_count() {
        let mut pc = PhaseController::new(0.0);
        assert_eq!(pc.evaluate(10.0, inputs(WORDS_PER_LEVEL_UNTIL_WAVE - 1, 0)), None);
        let change = pc.evaluate(20.0, inputs(WORDS_PER_LEVEL_UNTIL_WAVE, 0));
        assert_eq!(change, Some(PhaseChange { from: LevelPhase::Normal, to: LevelPhase::WaveWarning }));
        assert!(!pc.may_spawn());
    }

    #[test]
    fn wave_sequence_is_timed() {
        let mut pc = PhaseController::new(0.0);
        pc.enter(LevelPhase::WaveWarning, 0.0);
        assert_eq!(pc.evaluate(WAVE_WARNING_MS - 1.0, inputs(0, 0)), None);
        assert!(pc.evaluate(WAVE_WARNING_MS, inputs(0, 0)).is_some());
        assert_eq!(pc.phase(), LevelPhase::WaveAccelerate);
        let start = WAVE_WARNING_MS;
        assert!((pc.speed_multiplier(start) - WAVE_ACCELERATE_START_MULT).abs() < 1e-9);
        let mid = pc.speed_multiplier(start + WAVE_ACCELERATE_MS / 2.0);
        assert!((mid - (WAVE_ACCELERATE_START_MULT + WAVE_ACCELERATE_END_MULT) / 2.0).abs() < 1e-9);
        assert!(pc.evaluate(start + WAVE_ACCELERATE_MS, inputs(0, 0)).is_some());
        assert_eq!(pc.phase(), LevelPhase::WaveDeluge);
        assert_eq!(pc.speed_multiplier(start + WAVE_ACCELERATE_MS), WAVE_DELUGE_MULT);
    }

    #[test]
    fn deluge_needs_quota_and_empty_field() {
        let mut pc = PhaseController::new(0.0);
        pc.enter(LevelPhase::WaveDeluge, 0.0);
        for _ in 0..WAVE_DELUGE_WORD_COUNT {
            assert!(pc.may_spawn());
            pc.record_wave_spawn();
        }
        assert!(!pc.may_spawn());
        assert_eq!(pc.evaluate(100.0, inputs(0, 3)), None);
        assert_eq!(pc.evaluate(200.0, inputs(0, 0)).map(|c| c.to), Some(LevelPhase::Boss));
        assert!(pc.may_spawn());
    }

    #[test]
    fn transition_returns_to_normal() {
        let mut pc = PhaseController::new(0.0);
        pc.enter(LevelPhase::LevelTransition, 1000.0);
        assert_eq!(pc.evaluate(2999.0, inputs(0, 0)), None);
        assert_eq!(pc.evaluate(3000.0, inputs(0, 0)).map(|c| c.to), Some(LevelPhase::Normal));
    }

    #[test]
    fn spawn_interval_per_phase() {
        let settings = GameSettings::default();
        let mut pc = PhaseController::new(0.0);
        assert_eq!(pc.spawn_interval(&settings, 1), settings.spawn_rate_start);
        pc.enter(LevelPhase::Boss, 0.0);
        assert_eq!(pc.spawn_interval(&settings, 1), BOSS_SPAWN_INTERVAL_MS);
        pc.enter(LevelPhase::WaveDeluge, 0.0);
        assert_eq!(pc.spawn_interval(&settings, 1), WAVE_DELUGE_SPAWN_MS);
    }
}
