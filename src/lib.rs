//! Typing Thunder core crate.
//!
//! Words fall, the player types them before they reach the bottom. The
//! simulation in [`game`] is plain Rust driven by explicit timestamps, so it
//! runs the same under native tests and in the browser; [`web`] wires it to
//! `requestAnimationFrame` and keyboard events.

use wasm_bindgen::prelude::*;

pub mod game;
pub mod web;
pub mod words;

pub use game::config::{Difficulty, GameSettings};
pub use game::error::GameError;
pub use game::leaderboard::{InMemoryLeaderboard, LeaderboardEntry, LeaderboardGateway};
pub use game::{Game, GameEvent, GameSnapshot, GameStatus};
pub use words::WordBank;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (hot reload) fails harmlessly.
    let _ = console_log::init_with_level(log::Level::Info);
}
