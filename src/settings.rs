//! Scene settings and preferences
//!
//! Persisted in LocalStorage on web; defaults everywhere else.

use serde::{Deserialize, Serialize};

/// How the viewport scale multiplier is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum JitterMode {
    /// Fresh random multiplier for every object on every frame (shimmering scale)
    #[default]
    PerFrame,
    /// One multiplier per object, redrawn at mount and on resize
    PerResize,
}

impl JitterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JitterMode::PerFrame => "per-frame",
            JitterMode::PerResize => "per-resize",
        }
    }
}

/// Hero scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Scale jitter behaviour
    pub jitter: JitterMode,
    /// Fixed layout seed (None = seed from the clock at mount)
    pub seed: Option<u64>,
    /// Upper bound on device pixel ratio for the backing canvas
    pub max_pixel_ratio: f32,
    /// Wireframe opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Hold objects still (no clock advance, no per-frame updates)
    pub reduced_motion: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            jitter: JitterMode::PerFrame,
            seed: None,
            max_pixel_ratio: 2.0,
            opacity: 0.3,
            reduced_motion: false,
        }
    }
}

impl SceneSettings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "hero_scene_settings";

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed scene settings: {}", e);
                Self::default()
            }
        }
    }

    /// Seed to use for this mount
    pub fn resolve_seed(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded scene settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default scene settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
