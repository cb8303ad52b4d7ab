//! Per-frame simulation steps, run in a fixed order: motion, misses, purge.
//!
//! The loop itself lives in the driver; everything here takes the state it
//! needs as arguments so a tick never reads stale captured values.

use super::config::*;
use super::word::{Word, WordCategory};

/// Linear speed ramp installed after a pause or a lost life.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResumeRamp {
    pub started_at: f64,
}

impl ResumeRamp {
    pub fn new(now: f64) -> Self {
        Self { started_at: now }
    }

    pub fn multiplier(&self, now: f64) -> f64 {
        let t = ((now - self.started_at) / RESUME_RAMP_MS).clamp(0.0, 1.0);
        RESUME_RAMP_START + (1.0 - RESUME_RAMP_START) * t
    }

    pub fn finished(&self, now: f64) -> bool {
        now - self.started_at >= RESUME_RAMP_MS
    }
}

/// Frame bookkeeping owned by the game: spawn timer, ramp, last frame time.
#[derive(Clone, Debug, Default)]
pub struct SimulationClock {
    pub last_spawn_time: f64,
    pub last_frame: Option<f64>,
    ramp: Option<ResumeRamp>,
}

impl SimulationClock {
    pub fn new(now: f64) -> Self {
        Self { last_spawn_time: now, last_frame: None, ramp: None }
    }

    pub fn start_ramp(&mut self, now: f64) {
        self.ramp = Some(ResumeRamp::new(now));
    }

    pub fn cancel_ramp(&mut self) {
        self.ramp = None;
    }

    pub fn ramp(&self) -> Option<ResumeRamp> {
        self.ramp
    }

    /// Ramp factor for this frame; drops the ramp once it has run its course.
    pub fn ramp_multiplier(&mut self, now: f64) -> f64 {
        match self.ramp {
            Some(r) if r.finished(now) => {
                self.ramp = None;
                1.0
            }
            Some(r) => r.multiplier(now),
            None => 1.0,
        }
    }

    /// Real time since the previous frame; zero on the first frame.
    pub fn frame_elapsed(&mut self, now: f64) -> f64 {
        let elapsed = self.last_frame.map_or(0.0, |t| (now - t).max(0.0));
        self.last_frame = Some(now);
        elapsed
    }

    pub fn spawn_due(&self, now: f64, interval: f64) -> bool {
        now - self.last_spawn_time > interval
    }

    pub fn shift(&mut self, delta: f64) {
        self.last_spawn_time += delta;
        if let Some(r) = self.ramp.as_mut() {
            r.started_at += delta;
        }
        self.last_frame = None;
    }
}

pub fn effective_fall_speed(base: f64, phase_mult: f64, slow_mult: f64, ramp_mult: f64) -> f64 {
    base * phase_mult * slow_mult * ramp_mult
}

/// Step 2: move every falling word down. Projectiles also drift sideways and
/// bounce off the side walls.
pub fn advance_words(words: &mut [Word], speed: f64, ramp_mult: f64, field_width: f64) {
    for w in words.iter_mut().filter(|w| w.is_falling()) {
        w.y += speed;
        if w.category == WordCategory::Projectile && w.vx != 0.0 {
            w.x += w.vx * ramp_mult;
            let max_x = (field_width - w.pixel_width()).max(0.0);
            if w.x <= 0.0 {
                w.x = -w.x;
                w.vx = w.vx.abs();
            } else if w.x >= max_x {
                w.x = 2.0 * max_x - w.x;
                w.vx = -w.vx.abs();
            }
            w.x = w.x.clamp(0.0, max_x);
        }
    }
}

/// Step 3: count falling words that crossed the bottom. Power-up words leave
/// silently and are not counted.
pub fn count_misses(words: &[Word], field_height: f64) -> u32 {
    words
        .iter()
        .filter(|w| w.is_falling() && !w.is_power_up() && w.y >= field_height)
        .count() as u32
}

/// Step 4: drop off-screen falling words and tombstones whose exit delay elapsed.
pub fn purge_words(words: &mut Vec<Word>, field_height: f64, now: f64) {
    words.retain(|w| {
        if w.is_falling() {
            w.y < field_height
        } else {
            w.remove_at.is_some_and(|t| now < t)
        }
    });
}
