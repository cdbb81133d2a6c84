/// User-facing configuration for the schematic subsystem
///
/// Settings are stored as JSON. Every field has a default, so a partial
/// file (or none at all) still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::platform::PlatformSettings;
use crate::preview::{PreviewLayout, PreviewSettings};
use crate::render::software::DEFAULT_MAX_TEXTURE_SIZE;
use crate::world::MAX_SCHEMATIC_SIZE;

/// File extension of schematic files
pub const DEFAULT_EXTENSION: &str = "msch";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info,schemkit=debug";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    // ========== Files ==========

    /// Folder holding the user's own schematics
    pub schematic_dir: PathBuf,

    /// Folder with one subfolder per installed mod
    pub mods_dir: Option<PathBuf>,

    /// Extension (without the dot) a file needs to be loaded
    pub extension: String,

    // ========== Previews ==========

    /// Largest selection span, in tiles (see `world::max_extent`)
    pub max_schematic_size: i32,

    /// Empty tiles around each preview
    pub padding: u32,

    /// Pixels per tile
    pub resolution: u32,

    /// Minimum time between two cache evictions
    pub eviction_interval_ms: u64,

    /// Largest canvas edge the renderer may allocate
    pub max_texture_size: u32,

    /// PNG shown for schematics that fail to render
    pub placeholder_path: Option<PathBuf>,

    // ========== Host ==========
    pub log_filter: String,
    pub platform: PlatformSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schematic_dir: default_schematic_dir(),
            mods_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            max_schematic_size: MAX_SCHEMATIC_SIZE,
            padding: 2,
            resolution: 32,
            eviction_interval_ms: 2000,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            placeholder_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            platform: PlatformSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert to JSON string for storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read settings from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&content)?)
    }

    /// Write settings to `path`, creating parent folders as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_error)
    }

    /// Preview cache configuration derived from these settings
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            layout: PreviewLayout {
                padding: self.padding,
                resolution: self.resolution,
            },
            max_schematic_size: self.max_schematic_size.max(1) as u32,
            eviction_interval: Duration::from_millis(self.eviction_interval_ms),
            placeholder_path: self.placeholder_path.clone(),
        }
    }
}

/// Where schematics live when no folder is configured:
/// - Linux: ~/.local/share/schemkit/schematics
/// - macOS: ~/Library/Application Support/schemkit/schematics
/// - Windows: %APPDATA%\schemkit\schematics
pub fn default_schematic_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push("schemkit");
            path.push("schematics");
            path
        }
        None => PathBuf::from("schematics"),
    }
}
