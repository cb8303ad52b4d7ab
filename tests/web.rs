// Browser smoke tests for the `web` driver. Run with
// `wasm-pack test --headless --firefox`; skipped on native targets.
#![cfg(target_arch = "wasm32")]

use typing_thunder::web::{start_game, start_game_with, stop_game, toggle_pause};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn unknown_difficulty_is_rejected() {
    assert!(start_game_with("nightmare").is_err());
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen_test]
fn start_pause_and_stop() {
    use typing_thunder::web::game_snapshot;

    start_game().expect("starts with a window");
    let snap = game_snapshot().expect("snapshot serializes");
    assert!(snap.contains("\"status\":\"Playing\""), "{snap}");

    toggle_pause();
    let snap = game_snapshot().expect("snapshot serializes");
    assert!(snap.contains("\"status\":\"Paused\""), "{snap}");

    stop_game();
    assert_eq!(game_snapshot().expect("empty slot"), "null");
}
