//! Per-game best score
//!
//! One number per game, stored as plain JSON under the game's key. Only
//! ever raised, never lowered.

use crate::platform::storage::{KeyValueStore, load_json, save_json};

/// Best score for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    key: &'static str,
    best: u32,
}

impl HighScore {
    /// Start from zero without touching storage
    pub fn new(key: &'static str) -> Self {
        Self { key, best: 0 }
    }

    /// Load from storage; missing or unreadable values start at zero
    pub fn load(key: &'static str, store: &dyn KeyValueStore) -> Self {
        match load_json::<u32>(store, key) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {} for {}", best, key);
                Self { key, best }
            }
            Ok(None) => {
                log::info!("No high score for {}, starting fresh", key);
                Self::new(key)
            }
            Err(e) => {
                log::warn!("Ignoring stored high score: {}", e);
                Self::new(key)
            }
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Offer a final score. Returns true only if it beat the stored best.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Persist the current best; failures are logged, not raised
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, self.key, &self.best) {
            Ok(()) => log::info!("High score saved ({} = {})", self.key, self.best),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
