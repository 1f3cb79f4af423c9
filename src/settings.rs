//! Game settings and preferences
//!
//! Persisted separately from best scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences shared across the games
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Procedural sound effects on/off
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Orbit Hop: generate today's shared world instead of a random one
    pub daily_orbit: bool,
    /// Gate Run: practice on random layouts instead of the daily course
    pub practice_gate: bool,
    /// Balance: gentler wind and wider crash bounds
    pub easy_balance: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.55,
            daily_orbit: false,
            practice_gate: false,
            easy_balance: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "rocketArcade.settings.v1";

    /// Volume with out-of-range values clamped rather than rejected
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_sound_silences_volume() {
        let settings = Settings {
            sound: false,
            master_volume: 0.9,
            ..Settings::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_out_of_range_volume_is_clamped() {
        let settings = Settings {
            master_volume: 4.2,
            ..Settings::default()
        };
        assert_eq!(settings.effective_volume(), 1.0);
    }

    #[test]
    fn test_settings_round_trip_json() {
        let settings = Settings {
            daily_orbit: true,
            easy_balance: true,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.daily_orbit, settings.daily_orbit);
        assert_eq!(back.easy_balance, settings.easy_balance);
    }
}
