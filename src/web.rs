//! Browser driver: keyboard listener, animation-frame loop and a small HUD.
//!
//! The game lives in a thread-local slot; both the frame callback and the key
//! listener reach it through `GAME`, so nothing captures a stale copy.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, KeyboardEvent, window};

use crate::game::config::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, Difficulty, GameSettings};
use crate::game::error::GameError;
use crate::game::phase::LevelPhase;
use crate::game::powerup::PowerUpKind;
use crate::game::{Game, GameEvent, GameStatus};

const HUD_ID: &str = "tt-hud";

thread_local! {
    static GAME: RefCell<Option<Game>> = const { RefCell::new(None) };
    static FRAME_HANDLE: Cell<Option<i32>> = const { Cell::new(None) };
    static KEY_LISTENER: Cell<bool> = const { Cell::new(false) };
    static FLASH: RefCell<String> = const { RefCell::new(String::new()) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn to_js(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    start_game_with(Difficulty::Medium.name())
}

#[wasm_bindgen]
pub fn start_game_with(difficulty: &str) -> Result<(), JsValue> {
    let difficulty = Difficulty::parse(difficulty).map_err(to_js)?;
    start_with_settings(difficulty.preset())
}

/// Custom session; values outside the allowed ranges are rejected.
#[wasm_bindgen]
pub fn start_custom_game(
    difficulty: &str,
    lives: i32,
    fall_speed: f64,
    spawn_rate: f64,
    hardcore: bool,
) -> Result<(), JsValue> {
    let settings = GameSettings {
        difficulty: Difficulty::parse(difficulty).map_err(to_js)?,
        starting_lives: lives,
        fall_speed_start: fall_speed,
        spawn_rate_start: spawn_rate,
        hardcore_mode: hardcore,
    };
    start_with_settings(settings)
}

fn start_with_settings(settings: GameSettings) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    ensure_hud(&doc)?;
    install_key_listener(&doc)?;
    cancel_frame();

    let width = win.inner_width()?.as_f64().unwrap_or(DEFAULT_FIELD_WIDTH);
    let height = win.inner_height()?.as_f64().unwrap_or(DEFAULT_FIELD_HEIGHT);
    let now = performance_now();
    GAME.with(|cell| {
        let mut slot = cell.borrow_mut();
        let game = slot.get_or_insert_with(Game::new);
        game.set_field_size(width, height);
        game.start(settings, now)
    })
    .map_err(to_js)?;

    start_loop();
    Ok(())
}

/// Cancel the pending frame and drop the game; listeners become no-ops.
#[wasm_bindgen]
pub fn stop_game() {
    cancel_frame();
    GAME.with(|cell| cell.borrow_mut().take());
    log::info!("game stopped");
}

#[wasm_bindgen]
pub fn toggle_pause() {
    toggle_pause_at(performance_now());
}

fn toggle_pause_at(now: f64) {
    let playing = GAME.with(|cell| {
        cell.borrow_mut().as_mut().is_some_and(|game| {
            game.toggle_pause(now);
            game.status() == GameStatus::Playing
        })
    });
    if playing {
        start_loop();
    } else {
        cancel_frame();
    }
}

/// Current state as JSON for presentation layers; `null` before the first start.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn game_snapshot() -> Result<String, JsValue> {
    GAME.with(|cell| match cell.borrow().as_ref() {
        Some(game) => game.snapshot_json().map_err(to_js),
        None => Ok("null".to_string()),
    })
}

// --- Loop -------------------------------------------------------------------

fn start_loop() {
    cancel_frame();
    let Some(generation) = GAME.with(|cell| cell.borrow().as_ref().map(Game::generation)) else {
        return;
    };
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let running = GAME.with(|cell| match cell.borrow_mut().as_mut() {
            // A restarted game bumps the generation; frames from the old loop stop here.
            Some(game) if game.generation() == generation => {
                game.update(ts);
                record_flash(game.drain_events());
                render_hud(game);
                game.status() == GameStatus::Playing
            }
            _ => false,
        });
        if running {
            schedule(&f);
        } else {
            FRAME_HANDLE.with(|h| h.set(None));
        }
    }) as Box<dyn FnMut(f64)>));
    schedule(&g);
}

fn schedule(callback: &FrameCallback) {
    let Some(win) = window() else {
        return;
    };
    if let Some(cb) = callback.borrow().as_ref() {
        if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
            FRAME_HANDLE.with(|h| h.set(Some(id)));
        }
    }
}

fn cancel_frame() {
    if let Some(id) = FRAME_HANDLE.with(Cell::take) {
        if let Some(win) = window() {
            let _ = win.cancel_animation_frame(id);
        }
    }
}

// --- Keyboard ---------------------------------------------------------------

fn install_key_listener(doc: &Document) -> Result<(), JsValue> {
    if KEY_LISTENER.with(Cell::get) {
        return Ok(());
    }
    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        handle_key(&evt.key());
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    KEY_LISTENER.with(|l| l.set(true));
    Ok(())
}

fn handle_key(key: &str) {
    let now = performance_now();
    if key == "Escape" {
        toggle_pause_at(now);
        return;
    }
    GAME.with(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(game) = slot.as_mut() else {
            return;
        };
        if key == "Backspace" {
            let mut text = game.input().to_string();
            text.pop();
            game.on_input_change(&text, now);
        } else if let Some(c) = single_char(key) {
            if PowerUpKind::from_hotkey(c).is_some() {
                game.activate_hotkey(c, now);
            } else if extends_buffer(c) {
                let mut text = game.input().to_string();
                text.push(c);
                game.on_input_change(&text, now);
            }
        }
        record_flash(game.drain_events());
        render_hud(game);
    });
}

/// Every word is plain a-z; other keys would only count as mistypes.
fn extends_buffer(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// --- HUD --------------------------------------------------------------------

fn ensure_hud(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(HUD_ID).is_some() {
        return Ok(());
    }
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let div = doc.create_element("div")?;
    div.set_id(HUD_ID);
    div.set_attribute(
        "style",
        "position:fixed; top:10px; left:12px; font-family:'Fira Code', monospace; font-size:15px; \
         padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; \
         color:#ffd166; z-index:45; white-space:pre;",
    )?;
    body.append_child(&div)?;
    Ok(())
}

/// Keep the most notable event of the frame as a one-line banner.
fn record_flash(events: Vec<GameEvent>) {
    let banner = events.iter().rev().find_map(|e| match e {
        GameEvent::LifeLost { .. } => Some("STREAK BROKEN".to_string()),
        GameEvent::PhaseChanged(c) if c.to == LevelPhase::WaveWarning => Some("WAVE INCOMING".to_string()),
        GameEvent::BossSpawned { .. } => Some("BOSS!".to_string()),
        GameEvent::BossDefeated => Some("LEVEL CLEAR".to_string()),
        GameEvent::BossEscaped => Some("BOSS ESCAPED".to_string()),
        GameEvent::LevelUp { level } => Some(format!("LEVEL {level}")),
        GameEvent::PowerUpActivated { kind, .. } => Some(kind.label().to_string()),
        GameEvent::GameOver(stats) => Some(format!("GAME OVER  grade {}", stats.grade.as_str())),
        _ => None,
    });
    if let Some(banner) = banner {
        FLASH.with(|f| *f.borrow_mut() = banner);
    }
}

fn render_hud(game: &Game) {
    let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(HUD_ID))
    else {
        return;
    };
    let s = game.session();
    let mut text = format!(
        "Score: {}  Lives: {}  Level: {}  Combo: {}{}",
        s.score(),
        s.lives(),
        s.level(),
        s.combo(),
        if s.shield() { "  [shield]" } else { "" }
    );
    if let Some(boss) = game.boss() {
        text.push_str(&format!("\nBoss {}/{}: {}", boss.health, boss.max_health, boss.current_word()));
    }
    if game.status() == GameStatus::Paused {
        text.push_str("\nPAUSED");
    }
    FLASH.with(|f| {
        let flash = f.borrow();
        if !flash.is_empty() {
            text.push('\n');
            text.push_str(&flash);
        }
    });
    text.push_str("\n> ");
    text.push_str(game.input());
    el.set_text_content(Some(&text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_letters_reach_the_buffer() {
        assert!(extends_buffer('a'));
        assert!(extends_buffer('Q'));
        for c in ['0', '7', '9', '-', '\'', ' ', 'é'] {
            assert!(!extends_buffer(c), "{c:?}");
        }
    }

    #[test]
    fn named_keys_are_not_characters() {
        assert_eq!(single_char("k"), Some('k'));
        assert_eq!(single_char("Shift"), None);
        assert_eq!(single_char(""), None);
    }
}
