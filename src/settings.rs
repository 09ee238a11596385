//! Game settings and preferences
//!
//! Persisted separately from the best score, as JSON.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles drawn for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 200,
            QualityPreset::High => 500,
        }
    }

    /// Background star count
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 80,
            QualityPreset::High => 120,
        }
    }

    /// Circle tessellation segments
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => 16,
            QualityPreset::High => 28,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Fading trail behind the player
    pub trails: bool,
    /// Crash particle bursts
    pub particles: bool,
    /// Scrolling starfield background
    pub starfield: bool,
    /// Reduced motion (freezes the starfield scroll)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            trails: true,
            particles: true,
            starfield: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        // Low preset drops the trail for performance
        self.trails = preset != QualityPreset::Low;
    }

    /// Overlay host-page hints for the current session
    ///
    /// `quality` is a preset name; unknown names are ignored. The OS
    /// reduced-motion preference can only add to the stored choice.
    pub fn apply_page_hints(&mut self, quality: Option<&str>, prefers_reduced_motion: bool) {
        if let Some(preset) = quality.and_then(QualityPreset::parse) {
            self.apply_preset(preset);
        }
        self.reduced_motion |= prefers_reduced_motion;
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective star count
    pub fn star_count(&self) -> usize {
        if !self.starfield {
            0
        } else {
            self.quality.star_count()
        }
    }

    /// Whether the starfield scrolls (respects reduced_motion)
    pub fn starfield_scrolls(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json(store, SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, SETTINGS_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.as_str(), "Low");
    }

    #[test]
    fn test_low_preset_disables_trails() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.trails);
        assert_eq!(settings.max_particles(), 40);
    }

    #[test]
    fn test_toggles_zero_caps() {
        let settings = Settings {
            particles: false,
            starfield: false,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.star_count(), 0);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let settings = Settings {
            quality: QualityPreset::High,
            reduced_motion: true,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_raising_preset_restores_trails() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::load(&store);
        settings.apply_preset(QualityPreset::Low);
        settings.save(&mut store).unwrap();

        let mut reloaded = Settings::load(&store);
        assert!(!reloaded.trails);
        reloaded.apply_preset(QualityPreset::High);
        assert_eq!(reloaded.quality, QualityPreset::High);
        assert!(reloaded.trails);
    }

    #[test]
    fn test_page_hints_leave_storage_alone() {
        let mut store = MemoryStore::new();
        Settings::from_preset(QualityPreset::Low).save(&mut store).unwrap();

        let mut session = Settings::load(&store);
        session.apply_page_hints(Some("high"), true);
        assert_eq!(session.quality, QualityPreset::High);
        assert!(session.trails);
        assert!(!session.starfield_scrolls());

        // Next load without hints sees only what was stored
        let next = Settings::load(&store);
        assert_eq!(next.quality, QualityPreset::Low);
        assert!(!next.reduced_motion);

        let mut unknown = Settings::default();
        unknown.apply_page_hints(Some("ultra"), false);
        assert_eq!(unknown, Settings::default());
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "[1,2").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }
}
