//! Game settings and preferences
//!
//! Persisted in LocalStorage. Nothing about mission progress is stored.

use serde::{Deserialize, Serialize};

use crate::consts::{TIME_MULTIPLIER_DEFAULT, TIME_MULTIPLIER_MAX, TIME_MULTIPLIER_MIN};
use crate::neo::{DEFAULT_API_KEY, DEFAULT_FEED_URL};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// Time multiplier applied to orbital motion (slider value)
    pub time_multiplier: f32,

    // === NEO feed ===
    /// Feed endpoint
    pub feed_base_url: String,
    /// API key sent with the feed request
    pub feed_api_key: String,
    /// Length of the date window requested from the feed
    pub feed_window_days: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub audio_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_multiplier: TIME_MULTIPLIER_DEFAULT,

            feed_base_url: DEFAULT_FEED_URL.to_string(),
            feed_api_key: DEFAULT_API_KEY.to_string(),
            feed_window_days: 7,

            audio_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Clamp loaded values into their valid ranges
    pub fn sanitized(mut self) -> Self {
        self.time_multiplier = if self.time_multiplier.is_finite() {
            self.time_multiplier
                .clamp(TIME_MULTIPLIER_MIN, TIME_MULTIPLIER_MAX)
        } else {
            TIME_MULTIPLIER_DEFAULT
        };
        self.audio_volume = if self.audio_volume.is_finite() {
            self.audio_volume.clamp(0.0, 1.0)
        } else {
            0.8
        };
        if self.feed_window_days == 0 {
            self.feed_window_days = 1;
        }
        self
    }

    /// Decode settings JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str::<Settings>(json)
            .ok()
            .map(Settings::sanitized)
    }

    /// Effective audio volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.audio_volume }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "orbital_missions_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
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
