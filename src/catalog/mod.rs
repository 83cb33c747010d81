//! Ordered level catalog and the "current level" cursor.
//!
//! Level data is embedded (one file per level) so the game never depends on
//! fetching an external file. A JSON loader for the same record format is
//! available behind the `serde_json` feature.

use thiserror::Error;

use crate::level::{LevelDefinition, LevelError};
use crate::progress::{self, ProgressStore};

mod level1;
mod level2;
mod level3;

/// The embedded catalog, in play order.
pub fn levels() -> &'static [LevelDefinition] {
    use std::sync::OnceLock;
    static LEVELS_STATIC: OnceLock<Vec<LevelDefinition>> = OnceLock::new();
    LEVELS_STATIC.get_or_init(|| vec![level1::level1(), level2::level2(), level3::level3()])
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("level catalog is empty")]
    Empty,

    #[error("catalog entry {index} is invalid: {source}")]
    InvalidLevel {
        index: usize,
        #[source]
        source: LevelError,
    },

    #[cfg(feature = "serde_json")]
    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One record of the level data format:
/// `{ "level": 1, "cups": [5, 3], "target": 4, "optimalSteps": 6 }`.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    pub level: u32,
    pub cups: Vec<u32>,
    pub target: u32,
    #[serde(default)]
    pub optimal_steps: u32,
}

#[cfg(feature = "serde")]
impl From<LevelRecord> for LevelDefinition {
    fn from(r: LevelRecord) -> Self {
        LevelDefinition::catalog(r.level, r.cups, r.target, r.optimal_steps)
    }
}

/// Ordered, immutable list of levels plus the index of the one being played.
/// Never empty, so `current()` always has something to return.
#[derive(Clone, Debug)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
    current_index: usize,
}

impl LevelCatalog {
    pub fn embedded() -> Self {
        Self {
            levels: levels().to_vec(),
            current_index: 0,
        }
    }

    /// Builds a catalog from externally supplied levels, validating each one.
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, lvl) in levels.iter().enumerate() {
            lvl.validate()
                .map_err(|source| CatalogError::InvalidLevel { index, source })?;
        }
        Ok(Self {
            levels,
            current_index: 0,
        })
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<LevelRecord> = serde_json::from_str(json)?;
        let catalog = Self::new(records.into_iter().map(LevelDefinition::from).collect())?;
        log::info!("loaded {} levels from JSON", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &LevelDefinition {
        &self.levels[self.current_index]
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.levels.len()
    }

    /// Restores the cursor from the persisted index (0 if missing or out of range).
    pub fn restore(&mut self, store: &dyn ProgressStore, key: &str) {
        self.current_index = progress::load_level_index(store, key, self.levels.len());
        log::debug!("restored level index {}", self.current_index);
    }

    /// Moves to the next level. On the last level this does nothing and
    /// returns `None`.
    pub fn advance(&mut self) -> Option<&LevelDefinition> {
        if self.is_last() {
            return None;
        }
        self.current_index += 1;
        Some(&self.levels[self.current_index])
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}
