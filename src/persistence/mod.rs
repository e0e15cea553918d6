//! Local high score persistence
//!
//! A single integer under one storage key. Anything unreadable counts as 0.

use crate::platform::storage::KeyValueStore;

pub struct HighScoreStore {
    store: Box<dyn KeyValueStore>,
}

impl HighScoreStore {
    pub const STORAGE_KEY: &'static str = "bouquet_rescue_high_score";

    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored high score, 0 when absent or malformed
    pub fn load(&self) -> u64 {
        let Some(raw) = self.store.get_item(Self::STORAGE_KEY) else {
            return 0;
        };
        match raw.trim().parse::<u64>() {
            Ok(score) => score,
            Err(e) => {
                log::debug!("Stored high score {:?} unreadable ({}), using 0", raw, e);
                0
            }
        }
    }

    pub fn save(&mut self, score: u64) {
        match self.store.set_item(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::debug!("High score {} saved", score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
