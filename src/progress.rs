//! Persisted progress: a single key holding the current catalog level index.

use std::collections::HashMap;

/// Minimal string key-value store. The browser build backs this with
/// `localStorage`; tests and native callers use [`MemoryStore`].
///
/// Writes are fire-and-forget: a store that cannot persist just drops the value.
pub trait ProgressStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Reads the saved level index. Missing, non-numeric or out-of-range values
/// all fall back to level 0.
pub fn load_level_index(store: &dyn ProgressStore, key: &str, level_count: usize) -> usize {
    let Some(raw) = store.get(key) else {
        return 0;
    };
    match raw.trim().parse::<usize>() {
        Ok(idx) if idx < level_count => idx,
        _ => {
            log::warn!("ignoring saved level index {raw:?} (catalog has {level_count} levels)");
            0
        }
    }
}

pub fn save_level_index(store: &mut dyn ProgressStore, key: &str, index: usize) {
    store.set(key, &index.to_string());
}
