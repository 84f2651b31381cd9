//! User settings.
//!
//! Stored as JSON at `<config dir>/overlayboard/settings.json`. Every field has
//! a default, so partial files load and a missing or broken file falls back
//! to defaults instead of failing startup.

use crate::constants::{
    DEFAULT_APP_ORIGIN, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_EXPORT_PREFIX, DEFAULT_LOADER_THREADS,
    DEFAULT_MINIMUM_BALANCE, DEFAULT_TOKEN_DECIMALS, MIN_LAYER_SIZE,
};
use crate::error::Result;
use crate::geometry::CanvasSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical canvas width in pixels
    pub canvas_width: f64,
    /// Logical canvas height in pixels
    pub canvas_height: f64,
    /// Origin treated as same-origin for pixel readback
    pub app_origin: String,
    /// Relay used for cross-origin images, e.g. `http://127.0.0.1:19850/image-proxy`
    pub relay_endpoint: Option<String>,
    /// Export file name prefix
    pub export_prefix: String,
    /// JSON catalog replacing the built-in assets
    pub catalog_path: Option<PathBuf>,
    /// Worker threads for fetch and decode
    pub loader_threads: usize,
    /// Token balance required to edit
    pub minimum_balance: f64,
    /// Token decimals assumed when the chain does not report them
    pub token_decimals: u8,
    /// Background metadata API base URL
    pub metadata_endpoint: Option<String>,
    /// Sent as `X-API-KEY` to the metadata API
    pub metadata_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            app_origin: DEFAULT_APP_ORIGIN.to_string(),
            relay_endpoint: None,
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            catalog_path: None,
            loader_threads: DEFAULT_LOADER_THREADS,
            minimum_balance: DEFAULT_MINIMUM_BALANCE,
            token_decimals: DEFAULT_TOKEN_DECIMALS,
            metadata_endpoint: None,
            metadata_api_key: None,
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("overlayboard").join("settings.json"))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("No config directory available, using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "Loaded settings");
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        if settings.canvas_width < MIN_LAYER_SIZE || settings.canvas_height < MIN_LAYER_SIZE {
            warn!(
                width = settings.canvas_width,
                height = settings.canvas_height,
                "Canvas smaller than the minimum layer size, raising to {}",
                MIN_LAYER_SIZE
            );
        }
        Ok(settings)
    }

    /// Write pretty JSON, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Configured canvas, never smaller than one minimum-size layer.
    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(
            self.canvas_width.max(MIN_LAYER_SIZE),
            self.canvas_height.max(MIN_LAYER_SIZE),
        )
    }
}
