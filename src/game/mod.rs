//! Game core: one `Game` value owns every piece of mutable state and is
//! advanced only through `update` and the input handlers.

pub mod boss;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod leaderboard;
pub mod phase;
pub mod powerup;
pub mod scoring;
pub mod session;
pub mod spawner;
pub mod word;

#[cfg(test)]
mod scenarios;

use rand::SeedableRng;
use rand::rngs::StdRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::boss::{BossState, fire_projectile};
use self::clock::{SimulationClock, advance_words, count_misses, effective_fall_speed, purge_words};
use self::config::*;
use self::error::GameError;
use self::input::{InputMatcher, InputStatus, MatchTarget};
use self::leaderboard::LeaderboardEntry;
use self::phase::{LevelPhase, PhaseChange, PhaseController, PhaseInputs};
use self::powerup::{ActivePowerUp, EffectTarget, PowerUpKind, PowerUpMeter};
use self::scoring::{FloatingScore, WordScore, boss_hit_points, collateral_points};
use self::session::{FinalStats, GameSession};
use self::spawner::{SpawnKind, Spawner};
use self::word::{Word, WordCategory, WordId};
use crate::words::WordBank;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Discrete happenings queued for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    WordCompleted { id: WordId, points: u64 },
    Mistype,
    Missed { count: u32 },
    ShieldUsed,
    LifeLost { lives_left: i32 },
    PowerUpReady(PowerUpKind),
    PowerUpActivated { kind: PowerUpKind, affected: usize },
    BossSpawned { health: u32 },
    BossHit { health_left: u32, points: u64 },
    BossDefeated,
    BossEscaped,
    PhaseChanged(PhaseChange),
    LevelUp { level: u32 },
    GameOver(FinalStats),
}

/// Read-only view handed to renderers.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u64,
    pub lives: i32,
    pub level: u32,
    pub combo: u32,
    pub shield: bool,
    /// Start of the timing window for the next completion.
    pub last_completion_time: Option<f64>,
    pub phase: LevelPhase,
    pub words: Vec<Word>,
    pub boss: Option<BossState>,
    pub input: String,
    pub input_status: InputStatus,
    pub floating_scores: Vec<FloatingScore>,
    pub active_power_ups: Vec<ActivePowerUp>,
    pub meters: Vec<PowerUpMeter>,
    pub life_lost: bool,
    pub final_stats: Option<FinalStats>,
}

pub struct Game {
    status: GameStatus,
    session: GameSession,
    words: Vec<Word>,
    bank: WordBank,
    spawner: Spawner,
    clock: SimulationClock,
    phase: PhaseController,
    boss: Option<BossState>,
    input: InputMatcher,
    floating_scores: Vec<FloatingScore>,
    next_score_id: u64,
    events: Vec<GameEvent>,
    field_width: f64,
    field_height: f64,
    rng: StdRng,
    generation: u64,
    paused_at: Option<f64>,
    life_lost_until: Option<f64>,
}

impl Default for Game {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic game for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let settings = GameSettings::default();
        Self {
            status: GameStatus::Start,
            session: GameSession::new(settings, 0.0),
            words: Vec::new(),
            bank: WordBank::for_difficulty(settings.difficulty),
            spawner: Spawner::new(),
            clock: SimulationClock::new(0.0),
            phase: PhaseController::new(0.0),
            boss: None,
            input: InputMatcher::new(),
            floating_scores: Vec::new(),
            next_score_id: 1,
            events: Vec::new(),
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            rng,
            generation: 0,
            paused_at: None,
            life_lost_until: None,
        }
    }

    // --- Lifecycle ----------------------------------------------------------

    /// Begin a fresh session. Every previous word, timer and boss is dropped.
    pub fn start(&mut self, settings: GameSettings, now: f64) -> Result<(), GameError> {
        settings.validate()?;
        self.reset(settings, now);
        self.status = GameStatus::Playing;
        log::info!(
            "game started: {} ({} lives, generation {})",
            settings.difficulty.name(),
            self.session.lives,
            self.generation
        );
        Ok(())
    }

    pub fn return_to_start(&mut self) {
        let settings = self.session.settings;
        self.reset(settings, 0.0);
        self.status = GameStatus::Start;
    }

    fn reset(&mut self, settings: GameSettings, now: f64) {
        self.generation += 1;
        self.session = GameSession::new(settings, now);
        self.words.clear();
        self.bank = WordBank::for_difficulty(settings.difficulty);
        self.spawner = Spawner::new();
        self.clock = SimulationClock::new(now);
        self.phase = PhaseController::new(now);
        self.boss = None;
        self.input.clear();
        self.floating_scores.clear();
        self.events.clear();
        self.paused_at = None;
        self.life_lost_until = None;
    }

    /// Replace the word list for the current session.
    pub fn set_word_bank(&mut self, bank: WordBank) {
        self.bank = bank;
    }

    pub fn set_field_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.field_width = width;
            self.field_height = height;
        }
    }

    /// Playing <-> Paused. Resuming shifts every pending deadline by the time
    /// spent paused and eases motion back in.
    pub fn toggle_pause(&mut self, now: f64) {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.paused_at = Some(now);
                self.clock.cancel_ramp();
                log::debug!("paused");
            }
            GameStatus::Paused => {
                let delta = self.paused_at.take().map_or(0.0, |t| (now - t).max(0.0));
                self.shift_deadlines(delta);
                self.clock.start_ramp(now);
                self.status = GameStatus::Playing;
                log::debug!("resumed after {delta:.0} ms");
            }
            GameStatus::Start | GameStatus::GameOver => {}
        }
    }

    fn shift_deadlines(&mut self, delta: f64) {
        self.clock.shift(delta);
        self.phase.shift(delta);
        self.input.shift(delta);
        self.session.shift_deadlines(delta);
        for w in &mut self.words {
            if let Some(t) = w.remove_at.as_mut() {
                *t += delta;
            }
        }
        for f in &mut self.floating_scores {
            f.created_at += delta;
        }
        if let Some(t) = self.life_lost_until.as_mut() {
            *t += delta;
        }
    }

    // --- Frame --------------------------------------------------------------

    /// Advance the simulation to `now`. Does nothing unless playing.
    pub fn update(&mut self, now: f64) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.input.tick(now);
        self.floating_scores
            .retain(|f| now - f.created_at < FLOATING_SCORE_LIFETIME_MS);

        let elapsed = self.clock.frame_elapsed(now);
        if let Some(until) = self.life_lost_until {
            if now < until {
                purge_words(&mut self.words, self.field_height, now);
                return;
            }
            self.life_lost_until = None;
            self.clock.start_ramp(now);
        }

        if self.phase.phase().freezes_simulation() {
            purge_words(&mut self.words, self.field_height, now);
            self.session.expire_power_ups(now);
        } else {
            self.step(now, elapsed);
        }

        self.evaluate_phase(now);
        self.check_game_over(now);
    }

    fn step(&mut self, now: f64, elapsed: f64) {
        let ramp = self.clock.ramp_multiplier(now);
        let slow = self.session.slow_factor(now);
        let speed = effective_fall_speed(
            self.session.settings.base_fall_speed(self.session.level),
            self.phase.speed_multiplier(now),
            slow,
            ramp,
        );
        advance_words(&mut self.words, speed, ramp, self.field_width);

        let missed = count_misses(&self.words, self.field_height);
        if missed > 0 {
            self.apply_misses(missed, now);
        }
        purge_words(&mut self.words, self.field_height, now);
        self.session.expire_power_ups(now);
        self.spawn_if_due(now);

        if self.phase.phase() == LevelPhase::Boss {
            let escaped = self
                .boss
                .as_mut()
                .is_some_and(|b| b.advance_timer(elapsed, slow));
            if escaped {
                self.boss_escaped(now);
            }
        }
    }

    fn apply_misses(&mut self, missed: u32, now: f64) {
        let outcome = self.session.apply_misses(missed);
        self.events.push(GameEvent::Missed { count: outcome.missed });
        if outcome.shield_used {
            log::debug!("shield absorbed a miss");
            self.events.push(GameEvent::ShieldUsed);
        }
        if outcome.lives_lost > 0 {
            self.life_lost(now);
        }
    }

    fn life_lost(&mut self, now: f64) {
        let lives_left = self.session.lives;
        log::info!("life lost, {lives_left} left");
        self.events.push(GameEvent::LifeLost { lives_left });
        if lives_left > 0 {
            self.life_lost_until = Some(now + LIFE_LOST_FREEZE_MS);
            self.clock.cancel_ramp();
            self.input.clear();
        }
    }

    fn spawn_if_due(&mut self, now: f64) {
        if !self.phase.may_spawn() {
            return;
        }
        let interval = self.phase.spawn_interval(&self.session.settings, self.session.level);
        if !self.clock.spawn_due(now, interval) {
            return;
        }
        let kind = if self.phase.phase().is_wave() { SpawnKind::Wave } else { SpawnKind::Regular };
        let spawned = self.spawner.spawn(kind, &self.bank, &self.words, self.field_width, &mut self.rng);
        if let Some(word) = spawned {
            if kind == SpawnKind::Wave {
                self.phase.record_wave_spawn();
            }
            self.words.push(word);
        }
        self.clock.last_spawn_time = now;
    }

    fn evaluate_phase(&mut self, now: f64) {
        let inputs = PhaseInputs {
            words_cleared_this_level: self.session.words_cleared_this_level,
            wave_words_falling: self
                .words
                .iter()
                .filter(|w| w.is_falling() && w.category == WordCategory::Wave)
                .count(),
        };
        if let Some(change) = self.phase.evaluate(now, inputs) {
            self.on_phase_entered(change, now);
        }
    }

    fn enter_phase(&mut self, to: LevelPhase, now: f64) {
        let change = self.phase.enter(to, now);
        self.on_phase_entered(change, now);
    }

    fn on_phase_entered(&mut self, change: PhaseChange, now: f64) {
        self.events.push(GameEvent::PhaseChanged(change));
        match (change.from, change.to) {
            (_, LevelPhase::Boss) if self.boss.is_none() => {
                let boss = BossState::spawn(self.session.level, &mut self.rng);
                log::info!("boss spawned: {} words, {} health", boss.words.len(), boss.health);
                self.events.push(GameEvent::BossSpawned { health: boss.health });
                self.boss = Some(boss);
            }
            (LevelPhase::LevelTransition, LevelPhase::Normal) => {
                self.session.advance_level();
                self.boss = None;
                self.clock.start_ramp(now);
                self.clock.last_spawn_time = now;
                log::info!("level {}", self.session.level);
                self.events.push(GameEvent::LevelUp { level: self.session.level });
            }
            _ => {}
        }
    }

    fn boss_escaped(&mut self, now: f64) {
        log::info!("boss escaped");
        self.boss = None;
        self.session.reset_level_progress();
        self.session.lose_lives(1);
        self.events.push(GameEvent::BossEscaped);
        self.enter_phase(LevelPhase::Normal, now);
        self.life_lost(now);
    }

    fn check_game_over(&mut self, now: f64) {
        if self.session.check_game_over(now) {
            self.status = GameStatus::GameOver;
            self.life_lost_until = None;
            self.clock.cancel_ramp();
            if let Some(stats) = self.session.final_stats().copied() {
                log::info!(
                    "game over: score {} level {} grade {}",
                    stats.score,
                    stats.level,
                    stats.grade.as_str()
                );
                self.events.push(GameEvent::GameOver(stats));
            }
        }
    }

    // --- Input --------------------------------------------------------------

    /// Feed the whole current text of the input field. Ignored unless playing
    /// and outside the life-loss freeze.
    pub fn on_input_change(&mut self, text: &str, now: f64) {
        if !self.accepts_input(now) {
            return;
        }
        let boss_word = current_boss_word(self.phase.phase(), self.boss.as_ref());
        let mistyped = self.input.on_input_change(text, &self.words, boss_word, now);
        if mistyped {
            self.session.register_mistype();
            self.events.push(GameEvent::Mistype);
        }
        let Some(target) = self.input.resolve(&self.words, boss_word) else {
            return;
        };
        match target {
            MatchTarget::Boss => self.hit_boss(now),
            MatchTarget::PowerUp { index, kind } => {
                self.words[index].destroy(now, WORD_EXIT_DELAY_MS);
                self.session.break_combo();
                self.activate_power_up(kind, now);
            }
            MatchTarget::Words(indices) => self.complete(&indices, now),
        }
        self.input.clear();
        if self.phase.phase() == LevelPhase::Normal && self.session.check_score_level_up() {
            log::info!("score level up to {}", self.session.level);
            self.events.push(GameEvent::LevelUp { level: self.session.level });
        }
    }

    /// Hotkeys `1`..`6` fire the matching power-up when its meter is ready.
    pub fn activate_hotkey(&mut self, key: char, now: f64) -> bool {
        if !self.accepts_input(now) {
            return false;
        }
        let Some(kind) = PowerUpKind::from_hotkey(key) else {
            return false;
        };
        if !self.session.consume_meter(kind) {
            return false;
        }
        self.activate_power_up(kind, now);
        true
    }

    fn accepts_input(&self, now: f64) -> bool {
        self.status == GameStatus::Playing && self.life_lost_until.is_none_or(|t| now >= t)
    }

    fn activate_power_up(&mut self, kind: PowerUpKind, now: f64) {
        let mut target = EffectTarget {
            session: &mut self.session,
            words: &mut self.words,
            rng: &mut self.rng,
            now,
        };
        let affected = powerup::activate(kind, &mut target);
        self.events.push(GameEvent::PowerUpActivated { kind, affected });
    }

    fn complete(&mut self, indices: &[usize], now: f64) {
        let matched: Vec<Word> = indices.iter().map(|&i| self.words[i].clone()).collect();
        for &i in indices {
            self.words[i].destroy(now, WORD_EXIT_DELAY_MS);
        }
        let in_boss = self.phase.phase() == LevelPhase::Boss;
        let completion =
            scoring::complete_words(&mut self.session, &matched, self.field_height, in_boss, now);
        for (word, (x, y, score)) in matched.iter().zip(&completion.scores) {
            self.push_floating_score(score, *x, *y, now);
            self.events.push(GameEvent::WordCompleted { id: word.id, points: score.points });
        }
        for kind in completion.ready {
            self.events.push(GameEvent::PowerUpReady(kind));
        }
        if self.session.is_active(PowerUpKind::Frenzy, now) {
            self.frenzy_blast(&matched, in_boss, now);
        }
    }

    /// Destroy falling words near each completed word for a reduced award.
    fn frenzy_blast(&mut self, matched: &[Word], in_boss: bool, now: f64) {
        let boost = self.session.score_boost(now);
        let mut hits = Vec::new();
        for origin in matched {
            let (cx, cy) = origin.center();
            for w in self.words.iter_mut().filter(|w| w.is_falling() && !w.is_power_up()) {
                let (wx, wy) = w.center();
                if (wx - cx).hypot(wy - cy) <= FRENZY_RADIUS && w.destroy(now, WORD_EXIT_DELAY_MS) {
                    hits.push((w.id, w.text.chars().count(), w.category, wx, wy));
                }
            }
        }
        for (id, len, category, x, y) in hits {
            let points = collateral_points(len, boost);
            self.session.add_points(points);
            self.session.record_clear(len, !in_boss && category != WordCategory::Wave);
            self.floating_scores.push(FloatingScore {
                id: self.next_score_id,
                base: points,
                bonus: 0,
                timing_bonus: 0,
                timing_label: None,
                timing_multiplier: None,
                score_multiplier: (boost > 1.0).then_some(boost),
                x,
                y,
                created_at: now,
            });
            self.next_score_id += 1;
            self.events.push(GameEvent::WordCompleted { id, points });
        }
    }

    fn hit_boss(&mut self, now: f64) {
        let boost = self.session.score_boost(now);
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        let hit = boss.hit();
        let health_left = boss.health;
        let points = boss_hit_points(hit.word_len, boost);
        self.session.add_points(points);
        self.events.push(GameEvent::BossHit { health_left, points });
        self.floating_scores.push(FloatingScore {
            id: self.next_score_id,
            base: points,
            bonus: 0,
            timing_bonus: 0,
            timing_label: None,
            timing_multiplier: None,
            score_multiplier: (boost > 1.0).then_some(boost),
            x: self.field_width / 2.0,
            y: BOSS_Y,
            created_at: now,
        });
        self.next_score_id += 1;

        if hit.defeated {
            log::info!("boss defeated");
            self.events.push(GameEvent::BossDefeated);
            for w in self.words.iter_mut() {
                w.destroy(now, WIPE_EXIT_DELAY_MS);
            }
            self.enter_phase(LevelPhase::LevelTransition, now);
        } else {
            let id = self.spawner.next_id();
            let projectile = fire_projectile(id, self.field_width, &mut self.rng);
            self.words.push(projectile);
        }
    }

    fn push_floating_score(&mut self, score: &WordScore, x: f64, y: f64, now: f64) {
        let timing_bonus = score.multiplier_bonus();
        self.floating_scores.push(FloatingScore {
            id: self.next_score_id,
            base: score.base,
            bonus: score.position_bonus + score.combo_bonus,
            timing_bonus,
            timing_label: score.timing.tier.map(|t| t.label()),
            timing_multiplier: (score.timing.multiplier > 1.0).then_some(score.timing.multiplier),
            score_multiplier: (score.score_multiplier > 1.0).then_some(score.score_multiplier),
            x,
            y,
            created_at: now,
        });
        self.next_score_id += 1;
    }

    // --- Queries ------------------------------------------------------------

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Place a word directly on the field, bypassing the spawner.
    pub fn insert_word(&mut self, text: &str, x: f64, y: f64, category: WordCategory) -> WordId {
        let id = self.spawner.next_id();
        self.words.push(Word::new(id, text, x, y, category));
        id
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase.phase()
    }

    /// Jump the phase machine, running the same entry effects as a natural
    /// transition.
    pub fn force_phase(&mut self, to: LevelPhase, now: f64) {
        self.enter_phase(to, now);
    }

    pub fn boss(&self) -> Option<&BossState> {
        self.boss.as_ref()
    }

    pub fn input(&self) -> &str {
        self.input.buffer()
    }

    pub fn input_status(&self) -> InputStatus {
        self.input.status()
    }

    pub fn floating_scores(&self) -> &[FloatingScore] {
        &self.floating_scores
    }

    pub fn is_life_lost_freeze(&self) -> bool {
        self.life_lost_until.is_some()
    }

    /// Incremented on every start and every return to the start screen.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn field_size(&self) -> (f64, f64) {
        (self.field_width, self.field_height)
    }

    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.session.final_stats()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.session.score,
            lives: self.session.lives,
            level: self.session.level,
            combo: self.session.combo,
            shield: self.session.shield,
            last_completion_time: self.session.last_completion_time,
            phase: self.phase.phase(),
            words: self.words.clone(),
            boss: self.boss.clone(),
            input: self.input.buffer().to_string(),
            input_status: self.input.status(),
            floating_scores: self.floating_scores.clone(),
            active_power_ups: self.session.active_power_ups.clone(),
            meters: self.session.meters.iter().copied().collect(),
            life_lost: self.life_lost_until.is_some(),
            final_stats: self.session.final_stats().copied(),
        }
    }

    #[cfg(feature = "serde_json")]
    pub fn snapshot_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Leaderboard entry for a finished game; `None` before game over.
    pub fn leaderboard_entry(&self, name: &str, now: f64) -> Option<LeaderboardEntry> {
        let stats = self.session.final_stats()?;
        let name = name.trim();
        Some(LeaderboardEntry {
            id: format!("{}-{}", now as u64, self.generation),
            name: if name.is_empty() { "Anonymous".to_string() } else { name.to_string() },
            score: stats.score,
            grade: stats.grade,
            level: stats.level,
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            longest_combo: stats.longest_combo,
            difficulty: self.session.settings.difficulty,
            timestamp: now,
        })
    }
}

/// The boss word is only a match target while the boss phase is running.
fn current_boss_word(phase: LevelPhase, boss: Option<&BossState>) -> Option<&str> {
    match (phase, boss) {
        (LevelPhase::Boss, Some(boss)) => Some(boss.current_word()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> Game {
        let mut game = Game::with_seed(7);
        game.start(GameSettings::default(), 0.0).expect("default settings are valid");
        game.set_word_bank(WordBank::from_words(Vec::new()));
        game
    }

    #[test]
    fn start_rejects_bad_settings() {
        let mut game = Game::with_seed(1);
        let settings = GameSettings { starting_lives: 0, ..GameSettings::default() };
        assert!(game.start(settings, 0.0).is_err());
        assert_eq!(game.status(), GameStatus::Start);
    }

    #[test]
    fn update_is_noop_until_started() {
        let mut game = Game::with_seed(1);
        game.update(5000.0);
        assert!(game.words().is_empty());
    }

    #[test]
    fn typing_a_word_scores_and_clears_buffer() {
        let mut game = playing();
        let id = game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
        game.on_input_change("c", 10.0);
        game.on_input_change("ca", 20.0);
        game.on_input_change("cat", 30.0);
        assert_eq!(game.session().score, 6);
        assert_eq!(game.input(), "");
        assert!(game.drain_events().contains(&GameEvent::WordCompleted { id, points: 6 }));
        assert!(!game.words()[0].is_falling());
    }

    #[test]
    fn pause_shifts_deadlines() {
        let mut game = playing();
        game.session_mut()
            .active_power_ups
            .push(ActivePowerUp { kind: PowerUpKind::SlowTime, expiration: 1000.0 });
        game.update(100.0);
        game.toggle_pause(500.0);
        game.update(2000.0);
        assert_eq!(game.status(), GameStatus::Paused);
        game.toggle_pause(3500.0);
        assert_eq!(game.session().active_power_ups[0].expiration, 4000.0);
        assert_eq!(game.session().paused_ms, 3000.0);
        assert_eq!(game.snapshot().status, GameStatus::Playing);
    }

    #[test]
    fn input_ignored_while_paused_or_frozen() {
        let mut game = playing();
        game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
        game.toggle_pause(0.0);
        game.on_input_change("cat", 10.0);
        assert_eq!(game.session().score, 0);
        game.toggle_pause(20.0);
        game.insert_word("dog", 100.0, DEFAULT_FIELD_HEIGHT + 1.0, WordCategory::Plain);
        game.update(30.0);
        assert!(game.is_life_lost_freeze());
        game.on_input_change("cat", 40.0);
        assert_eq!(game.session().score, 0);
    }

    #[test]
    fn life_loss_freeze_ends_with_ramp() {
        let mut game = playing();
        game.insert_word("dog", 100.0, DEFAULT_FIELD_HEIGHT, WordCategory::Plain);
        game.update(0.0);
        assert_eq!(game.session().lives, 2);
        let id = game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
        game.update(LIFE_LOST_FREEZE_MS - 1.0);
        assert_eq!(game.words().iter().find(|w| w.id == id).map(|w| w.y), Some(0.0));
        game.update(LIFE_LOST_FREEZE_MS);
        assert!(!game.is_life_lost_freeze());
        let y = game.words().iter().find(|w| w.id == id).map_or(0.0, |w| w.y);
        assert!(y > 0.0 && y < WORD_FALL_SPEED_START);
    }

    #[test]
    fn hotkey_requires_ready_meter() {
        let mut game = playing();
        assert!(!game.activate_hotkey('3', 0.0));
        game.session_mut().meters.get_mut(PowerUpKind::Shield).advance(THRESHOLD_SHIELD);
        assert!(game.activate_hotkey('3', 0.0));
        assert!(game.session().shield);
        assert!(!game.session().meters.get(PowerUpKind::Shield).is_ready());
    }

    #[test]
    fn power_up_word_resets_combo_without_scoring() {
        let mut game = playing();
        game.session_mut().combo = 5;
        game.insert_word("BOOST", 0.0, 10.0, WordCategory::PowerUp(PowerUpKind::ScoreMultiplier));
        game.on_input_change("boost", 0.0);
        assert_eq!(game.session().combo, 0);
        assert_eq!(game.session().score, 0);
        assert!(game.session().is_active(PowerUpKind::ScoreMultiplier, 1.0));
    }

    #[test]
    fn frenzy_destroys_neighbours() {
        let mut game = playing();
        game.session_mut()
            .active_power_ups
            .push(ActivePowerUp { kind: PowerUpKind::Frenzy, expiration: 10_000.0 });
        game.insert_word("cat", 100.0, 100.0, WordCategory::Plain);
        game.insert_word("planet", 150.0, 150.0, WordCategory::Plain);
        game.insert_word("far", 700.0, 500.0, WordCategory::Plain);
        game.on_input_change("cat", 0.0);
        let falling: Vec<&str> =
            game.words().iter().filter(|w| w.is_falling()).map(|w| w.text.as_str()).collect();
        assert_eq!(falling, vec!["far"]);
        assert_eq!(game.session().total_words_cleared, 2);
    }

    #[test]
    fn return_to_start_drops_session_state() {
        let mut game = playing();
        let generation = game.generation();
        game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
        game.return_to_start();
        assert_eq!(game.status(), GameStatus::Start);
        assert!(game.words().is_empty());
        assert!(game.generation() > generation);
    }
}
