//! Water Pour core crate.
//!
//! A water-pouring puzzle: cups with fixed capacities, three legal moves
//! (fill to the brim, empty to zero, pour until the source is empty or the
//! destination is full) and a target volume to measure in any single cup.
//!
//! The game logic ([`engine`], [`level`], [`catalog`], [`game`]) is plain Rust
//! and runs natively under `cargo test`. The [`view`] module is the browser
//! front end exposed to JS through `start_game()`.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod config;
pub mod engine;
pub mod game;
pub mod level;
pub mod progress;
pub mod view;

pub use catalog::{CatalogError, LevelCatalog};
pub use config::GameConfig;
pub use engine::{Cup, EngineEvent, PourEngine, PuzzleState, RejectReason, Selection};
pub use game::{GameSession, WinHeadline, WinSummary};
pub use level::{LevelDefinition, LevelError, LevelKind, build_custom_level, parse_custom_level};
pub use progress::{MemoryStore, ProgressStore};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    view::logger::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    view::start_game()
}
