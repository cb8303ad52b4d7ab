//! Whole-game scenarios that need a session in a specific state. They live
//! inside the crate because session counters only change through gameplay
//! from the outside.

use super::config::*;
use super::phase::LevelPhase;
use super::powerup::PowerUpKind;
use super::word::{WordCategory, WordStatus};
use super::{Game, GameEvent};
use crate::words::WordBank;

fn quiet_game() -> Game {
    let mut game = Game::with_seed(42);
    game.start(GameSettings::default(), 0.0).expect("default settings are valid");
    game.set_word_bank(WordBank::from_words(Vec::new()));
    game
}

#[test]
fn timing_window_and_combo_stack() {
    let mut game = quiet_game();
    game.session_mut().combo = 4;
    game.session_mut().last_completion_time = Some(1000.0);
    game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
    game.on_input_change("cat", 3800.0);
    // round((3 + 3 + 1) * (1 + 200/3000)) = round(7.47)
    assert_eq!(game.session().score(), 7);
    let fs = &game.floating_scores()[0];
    assert_eq!(fs.timing_label, Some("GOOD"));
    assert!(fs.timing_multiplier.is_some_and(|m| (m - 1.0667).abs() < 1e-3));
    assert_eq!(game.snapshot().last_completion_time, Some(3800.0));
}

#[test]
fn two_simultaneous_misses_cost_two_lives() {
    let mut game = quiet_game();
    game.session_mut().combo = 5;
    game.insert_word("cat", 100.0, DEFAULT_FIELD_HEIGHT, WordCategory::Plain);
    game.insert_word("dog", 300.0, DEFAULT_FIELD_HEIGHT - 0.1, WordCategory::Plain);
    game.update(10.0);
    assert_eq!(game.session().lives(), 1);
    assert_eq!(game.session().combo(), 0);
    assert!(game.words().iter().all(|w| w.y < DEFAULT_FIELD_HEIGHT));
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::Missed { count: 2 }));
    assert!(events.contains(&GameEvent::LifeLost { lives_left: 1 }));
}

#[test]
fn shield_saves_life_not_combo() {
    let mut game = quiet_game();
    game.session_mut().combo = 5;
    game.session_mut().shield = true;
    game.insert_word("cat", 100.0, DEFAULT_FIELD_HEIGHT, WordCategory::Plain);
    game.update(10.0);
    assert_eq!(game.session().lives(), 3);
    assert!(!game.session().shield());
    assert_eq!(game.session().combo(), 0);
    assert!(!game.is_life_lost_freeze());
    assert!(game.drain_events().contains(&GameEvent::ShieldUsed));
}

#[test]
fn wave_warning_blocks_spawns() {
    let mut game = Game::with_seed(42);
    game.start(GameSettings::default(), 0.0).expect("default settings are valid");
    game.session_mut().words_cleared_this_level = WORDS_PER_LEVEL_UNTIL_WAVE;
    game.update(10.0);
    assert_eq!(game.phase(), LevelPhase::WaveWarning);

    // Past the regular spawn interval, but nothing may spawn during the warning.
    game.update(1900.0);
    game.update(2000.0);
    assert!(game.words().is_empty());

    game.update(10.0 + WAVE_WARNING_MS);
    assert_eq!(game.phase(), LevelPhase::WaveAccelerate);
    game.update(20.0 + WAVE_WARNING_MS);
    assert!(game.words().iter().any(|w| w.category == WordCategory::Wave));
}

#[test]
fn unify_letter_completes_all_transformed_words() {
    let mut game = quiet_game();
    for (i, text) in ["planet", "garden", "window"].iter().enumerate() {
        game.insert_word(text, i as f64 * 200.0, 100.0 + i as f64 * 50.0, WordCategory::Plain);
    }
    game.session_mut().meters.get_mut(PowerUpKind::Unify).advance(THRESHOLD_UNIFY);
    assert!(game.activate_hotkey('5', 0.0));
    let letter = game.words()[0].text.clone();
    assert!(game.words().iter().all(|w| w.text == letter && w.category == WordCategory::Transformed));

    game.on_input_change(&letter, 100.0);
    assert!(game.words().iter().all(|w| w.status == WordStatus::Destroyed));
    assert_eq!(game.session().combo(), 3);
    assert_eq!(game.session().total_words_cleared(), 3);
}

#[test]
fn mistypes_count_toward_accuracy() {
    let mut game = quiet_game();
    game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
    game.session_mut().combo = 2;
    game.on_input_change("x", 0.0);
    assert_eq!(game.session().total_mistypes(), 1);
    assert_eq!(game.session().combo(), 2);
    assert!(game.drain_events().contains(&GameEvent::Mistype));
}

#[test]
fn score_threshold_levels_up_in_normal_phase() {
    let mut game = quiet_game();
    game.session_mut().score = 99;
    game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
    game.on_input_change("cat", 0.0);
    assert_eq!(game.session().level(), 2);
    assert!(game.drain_events().contains(&GameEvent::LevelUp { level: 2 }));
}

#[test]
fn pausing_mid_ramp_restarts_the_ramp_on_resume() {
    let mut game = quiet_game();
    game.insert_word("dog", 100.0, DEFAULT_FIELD_HEIGHT, WordCategory::Plain);
    game.update(0.0);
    assert_eq!(game.session().lives(), 2);
    let id = game.insert_word("cat", 100.0, 0.0, WordCategory::Plain);
    let y_of = |game: &Game| game.words().iter().find(|w| w.id == id).map_or(0.0, |w| w.y);

    // Freeze ends, ramp starts; pause halfway through it.
    game.update(LIFE_LOST_FREEZE_MS);
    game.update(LIFE_LOST_FREEZE_MS + RESUME_RAMP_MS / 2.0);
    game.toggle_pause(LIFE_LOST_FREEZE_MS + RESUME_RAMP_MS / 2.0);
    assert!(game.clock.ramp().is_none());

    let resumed_at = 10_000.0;
    game.toggle_pause(resumed_at);
    let ramp = game.clock.ramp().expect("resume installs a fresh ramp");
    assert_eq!(ramp.started_at, resumed_at);

    let before = y_of(&game);
    game.update(resumed_at);
    let step = y_of(&game) - before;
    let base = game.session().settings().base_fall_speed(1);
    assert!((step - base * RESUME_RAMP_START).abs() < 1e-9, "step {step}");
}
