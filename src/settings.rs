//! Game settings and preferences
//!
//! Persisted as JSON next to the best score, under its own key.

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

/// What happens after the bomb hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReturnToMenu {
    /// Route to the main menu on the tick after game over
    #[default]
    Auto,
    /// Stay on the frozen game frame until "Back to Menu" is confirmed
    OnConfirm,
}

impl ReturnToMenu {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnToMenu::Auto => "Auto",
            ReturnToMenu::OnConfirm => "OnConfirm",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Start with audio muted
    pub start_muted: bool,

    // === Flow ===
    pub return_to_menu: ReturnToMenu,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            start_muted: false,
            return_to_menu: ReturnToMenu::Auto,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "fox_likes_stars_settings";

    /// Volumes clamped to 0.0 - 1.0
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged
    pub fn save(&self, store: &impl KeyValueStore) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode settings: {}", e);
                return;
            }
        };

        match store.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}
