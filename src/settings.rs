//! Player preferences
//!
//! Persisted as JSON through the key-value store, separately from the wallet
//! and inventory.

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual effects ===
    /// Screen shake on crashes
    pub screen_shake: bool,
    /// Jump puffs, coin sparkles, crash debris
    pub particles: bool,
    /// White flash on pass and level up
    pub flash_effects: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            screen_shake: true,
            particles: true,
            flash_effects: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "rudolph_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash_effects && !self.reduced_motion
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring corrupt settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialise settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_roundtrip_through_store() {
        let store = MemoryStore::new();
        let settings = Settings {
            muted: true,
            screen_shake: false,
            ..Settings::default()
        };
        settings.save(&store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_or_partial_data() {
        let store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());

        store.set(Settings::STORAGE_KEY, r#"{"muted":true}"#);
        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert_eq!(loaded.master_volume, 0.8);
    }

    #[test]
    fn test_reduced_motion_overrides() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_flash());
        assert!(Settings::default().effective_flash());
    }
}
