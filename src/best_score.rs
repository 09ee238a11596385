//! Best score tracking
//!
//! A single integer persisted under [`BEST_SCORE_KEY`]. Stored as plain
//! decimal text so older saves stay readable.

use crate::consts::BEST_SCORE_KEY;
use crate::persistence::{KeyValueStore, StoreError};

/// Best score across all runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Load from storage; missing, unreadable or malformed values read as 0
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(BEST_SCORE_KEY) {
            Ok(Some(text)) => Self::new(parse_score(&text)),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Could not read best score: {e}");
                Self::default()
            }
        }
    }

    /// Record a finished run; returns true if it set a new best
    pub fn record(&mut self, final_score: u64) -> bool {
        if final_score > self.value {
            self.value = final_score;
            true
        } else {
            false
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(BEST_SCORE_KEY, &self.value.to_string())
    }
}

/// Parse a stored score, tolerating floats and junk
fn parse_score(text: &str) -> u64 {
    let text = text.trim();
    if let Ok(v) = text.parse::<u64>() {
        return v;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.floor() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record_keeps_max() {
        let mut best = BestScore::default();
        assert!(best.record(50));
        assert!(!best.record(30));
        assert!(!best.record(50));
        assert_eq!(best.get(), 50);
    }

    #[test]
    fn test_load_and_save() {
        let mut store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).get(), 0);

        BestScore::new(123).save(&mut store).unwrap();
        assert_eq!(store.get(BEST_SCORE_KEY).unwrap().as_deref(), Some("123"));
        assert_eq!(BestScore::load(&store).get(), 123);
    }

    #[test]
    fn test_malformed_values() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score(" 17.9 "), 17);
        assert_eq!(parse_score("-5"), 0);
        assert_eq!(parse_score("NaN"), 0);
        assert_eq!(parse_score("lots"), 0);
        assert_eq!(parse_score(""), 0);
    }
}
