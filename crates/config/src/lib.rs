//! Shared configuration for Atelier
//!
//! This crate provides the single source of truth for window dimensions,
//! asset loading policy, the furniture catalog, and the room layout. Every
//! section has built-in defaults; a JSON config file may override any subset.

use std::path::{Path, PathBuf};
use std::time::Duration;

use atelier_ipc::{CameraState, EditorState, FurnitureCategory, FurnitureTemplate, Room};
use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

mod catalog;
mod error;
mod room;

pub use catalog::default_categories;
pub use error::ConfigError;
pub use room::default_room;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1600;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 900;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "ATELIER_CONFIG";

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    /// Get width as f32 for calculations
    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    /// Get height as f32 for calculations
    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }
}

/// Model loading policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct AssetConfig {
    /// Directory model paths are resolved against
    pub root: PathBuf,
    /// Total attempts per model, including the first
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds
    pub initial_backoff_ms: u64,
    /// Factor applied to the delay after each retry
    pub backoff_multiplier: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            max_attempts: 3,
            initial_backoff_ms: 200,
            backoff_multiplier: 2,
        }
    }
}

impl AssetConfig {
    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.backoff_multiplier.max(1))
            .saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct EditorConfig {
    pub display: DisplayConfig,
    pub assets: AssetConfig,
    pub catalog: Vec<FurnitureCategory>,
    pub room: Room,
    pub camera: CameraState,
    pub editor: EditorState,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            assets: AssetConfig::default(),
            catalog: default_categories(),
            room: default_room(),
            camera: CameraState::default(),
            editor: EditorState::default(),
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file; missing sections keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Load from the file named by `ATELIER_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Check values the editor cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.grid_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be positive, got {}",
                self.editor.grid_size
            )));
        }
        if self.assets.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        for template in self.templates() {
            if template.default_scale.iter().any(|s| *s <= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "template {} has a non-positive default scale",
                    template.id
                )));
            }
        }
        Ok(())
    }

    /// All templates across categories, in catalog order
    pub fn templates(&self) -> impl Iterator<Item = &FurnitureTemplate> {
        self.catalog.iter().flat_map(|category| category.items.iter())
    }
}
