//! Configuration for framewm
//!
//! Read from TOML at `~/.config/framewm/config.toml` when present. The file is
//! optional and never written; every field falls back to its default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub frame: FrameConfig,
    pub demo_window: DemoWindowConfig,
}

impl Config {
    /// Load configuration from the user's config directory, or use defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from `path`; a missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("framewm").join("config.toml"))
    }
}

/// Frame decoration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Border width in pixels
    pub border_width: u32,
    /// Border color as 0xRRGGBB pixel
    pub border_color: u32,
    /// Background color as 0xRRGGBB pixel
    pub background_color: u32,
    /// Client position inside its frame
    pub client_offset_x: i32,
    pub client_offset_y: i32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            border_width: 3,
            border_color: 0x6633bb,
            background_color: 0x000000,
            client_offset_x: 0,
            client_offset_y: 0,
        }
    }
}

/// Window opened by the placeholder key binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoWindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for DemoWindowConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
        }
    }
}
