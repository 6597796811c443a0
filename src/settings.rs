//! Player settings and preferences
//!
//! Persisted separately from the leaderboard in LocalStorage. The page
//! exposes every field: a mute button, a volume slider and a motion toggle.

use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::platform::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Slap volume (0.0 - 1.0)
    pub volume: f32,
    /// Mute all audio
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no frame shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "flippa_settings";

    /// Set slap volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = if vol.is_nan() { 1.0 } else { vol.clamp(0.0, 1.0) };
    }

    /// Volume actually applied to playback
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Whether the game frame shakes on a slap
    pub fn effective_screen_shake(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, falling back to defaults on absence or bad data
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut settings: Self = persistence::load_or_default(store, Self::STORAGE_KEY);
        // A hand-edited store may hold an out-of-range volume
        settings.set_volume(settings.volume);
        settings
    }

    /// Save settings; failures are logged only
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) {
        match persistence::save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}
