//! Best score tracking
//!
//! A single integer persisted under a fixed key. Read once at startup,
//! written only when a run beats it.

use crate::platform::storage::{KeyValueStore, StorageError};

/// Best score across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flappy_canvas_best";

    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run; returns true if it set a new best
    pub fn submit(&mut self, score: u32) -> bool {
        if self.qualifies(score) {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Parse a stored value
    pub fn parse(raw: &str) -> Result<u32, StorageError> {
        raw.trim()
            .parse::<u32>()
            .map_err(|e| StorageError::Malformed {
                key: Self::STORAGE_KEY.to_string(),
                reason: e.to_string(),
            })
    }

    /// Load the best score, starting fresh on a missing or unreadable value
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let loaded = store
            .get(Self::STORAGE_KEY)
            .and_then(|raw| raw.as_deref().map(Self::parse).transpose());
        match loaded {
            Ok(Some(best)) => {
                log::info!("Loaded best score {}", best);
                Self::new(best)
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                Self::default()
            }
        }
    }

    /// Persist the best score
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.best.to_string())?;
        log::info!("Best score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::storage::MemoryStore;

    #[test]
    fn test_submit_only_raises() {
        let mut hs = HighScore::new(5);
        assert!(!hs.submit(5));
        assert!(!hs.submit(3));
        assert_eq!(hs.best(), 5);
        assert!(hs.submit(9));
        assert_eq!(hs.best(), 9);
    }

    #[test]
    fn test_zero_never_qualifies_on_fresh_board() {
        assert!(!HighScore::default().qualifies(0));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best(), 0);
        HighScore::new(17).save(&mut store).unwrap();
        assert_eq!(
            store.get(HighScore::STORAGE_KEY).unwrap().as_deref(),
            Some("17")
        );
        assert_eq!(HighScore::load(&store).best(), 17);
    }

    #[test]
    fn test_load_malformed_starts_fresh() {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(HighScore::load(&store), HighScore::default());
        assert!(matches!(
            HighScore::parse("lots"),
            Err(StorageError::Malformed { .. })
        ));
        assert_eq!(HighScore::parse(" 12\n").unwrap(), 12);
    }
}
