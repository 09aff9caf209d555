//! Player preferences
//!
//! Persisted as JSON in LocalStorage. Missing fields fall back to defaults,
//! so older saves keep loading.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Confetti on success
    pub particles: bool,
    /// White flash on success
    pub success_flash: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses the flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            particles: true,
            success_flash: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "shape_muncher_settings";

    /// Effective success flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.success_flash && !self.reduced_motion
    }

    /// Parse stored JSON, falling back to defaults on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring stored settings: {err}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(err) => log::warn!("Failed to serialize settings: {err}"),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No storage for {} natively", Self::STORAGE_KEY);
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
    fn test_round_trip() {
        let settings = Settings {
            muted: true,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let json = settings.to_json().expect("serialize");
        assert_eq!(Settings::from_json(&json), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"muted":true}"#);
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.particles);
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_reduced_motion_disables_flash() {
        let mut settings = Settings::default();
        assert!(settings.effective_flash());
        settings.reduced_motion = true;
        assert!(!settings.effective_flash());
    }
}
