//! Game session: the catalog, the pour engine and the progress store wired
//! together behind the actions a UI can trigger.

use crate::catalog::LevelCatalog;
use crate::config::GameConfig;
use crate::engine::{EngineEvent, PourEngine, PuzzleState};
use crate::level::{self, LevelDefinition, LevelError, LevelKind};
use crate::progress::{self, ProgressStore};

/// Headline shown when a level is solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinHeadline {
    Victory,
    /// Last catalog level solved.
    CatalogCleared,
    CustomCleared,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinSummary {
    pub headline: WinHeadline,
    pub steps: u32,
    /// Known-optimal step count; `None` for custom levels.
    pub optimal_steps: Option<u32>,
    pub next_level_available: bool,
}

pub struct GameSession<S: ProgressStore> {
    catalog: LevelCatalog,
    engine: PourEngine,
    store: S,
    config: GameConfig,
}

impl<S: ProgressStore> GameSession<S> {
    /// Restores the saved level index from `store` and loads that level.
    pub fn new(mut catalog: LevelCatalog, store: S, config: GameConfig) -> Self {
        catalog.restore(&store, config.storage_key);
        let engine = PourEngine::new(catalog.current());
        log::info!(
            "session started at level {} of {}",
            catalog.current_index() + 1,
            catalog.len()
        );
        Self {
            catalog,
            engine,
            store,
            config,
        }
    }

    pub fn state(&self) -> &PuzzleState {
        self.engine.state()
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn select_cup(&mut self, index: usize) -> Vec<EngineEvent> {
        self.engine.select_cup(index)
    }

    pub fn fill(&mut self) -> Vec<EngineEvent> {
        self.engine.fill()
    }

    pub fn empty(&mut self) -> Vec<EngineEvent> {
        self.engine.empty()
    }

    /// The level being played. For a custom level this is rebuilt from the
    /// live cups and target.
    pub fn current_level_definition(&self) -> LevelDefinition {
        let state = self.engine.state();
        if state.is_custom_level() {
            LevelDefinition {
                kind: LevelKind::Custom,
                cups: state.cups().iter().map(|c| c.capacity()).collect(),
                target: state.target(),
            }
        } else {
            self.catalog.current().clone()
        }
    }

    /// Starts the current level over.
    pub fn reset(&mut self) -> Vec<EngineEvent> {
        let level = self.current_level_definition();
        self.engine.reset(&level)
    }

    /// Same as [`reset`](Self::reset); used from the win dialog.
    pub fn replay(&mut self) -> Vec<EngineEvent> {
        self.reset()
    }

    /// Validates the form input and switches to the custom level. On error
    /// the current puzzle is left untouched.
    pub fn start_custom(&mut self, cup1: &str, cup2: &str, target: &str) -> Result<Vec<EngineEvent>, LevelError> {
        let level = level::parse_custom_level(cup1, cup2, target)?;
        log::info!("starting custom level {:?} -> {}", level.cups, level.target);
        Ok(self.engine.reset(&level))
    }

    pub fn is_last_level(&self) -> bool {
        self.catalog.is_last()
    }

    /// Next level is offered only on catalog levels other than the last one.
    pub fn can_advance(&self) -> bool {
        !self.engine.state().is_custom_level() && !self.catalog.is_last()
    }

    /// Moves to the next catalog level and saves progress. No-op (no events)
    /// on custom levels or the last level.
    pub fn advance_level(&mut self) -> Vec<EngineEvent> {
        if self.engine.state().is_custom_level() {
            return Vec::new();
        }
        let Some(next) = self.catalog.advance().cloned() else {
            return Vec::new();
        };
        progress::save_level_index(&mut self.store, self.config.storage_key, self.catalog.current_index());
        log::info!("advanced to level {}", self.catalog.current_index() + 1);
        self.engine.reset(&next)
    }

    /// Summary for the win dialog, or `None` if the puzzle is not solved.
    pub fn win_summary(&self) -> Option<WinSummary> {
        let state = self.engine.state();
        if !state.is_won() {
            return None;
        }
        let custom = state.is_custom_level();
        let headline = if custom {
            WinHeadline::CustomCleared
        } else if self.catalog.is_last() {
            WinHeadline::CatalogCleared
        } else {
            WinHeadline::Victory
        };
        Some(WinSummary {
            headline,
            steps: state.steps(),
            optimal_steps: (!custom).then(|| state.optimal_steps()),
            next_level_available: self.can_advance(),
        })
    }
}
