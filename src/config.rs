/// Runtime configuration
///
/// The GIPHY API key is never embedded in request code: it comes from the
/// optional config file or the `GIPHY_API_KEY` environment variable.
///
/// File location:
/// - Linux: ~/.config/gif-layers/config.json
/// - macOS: ~/Library/Application Support/gif-layers/config.json
/// - Windows: %APPDATA%\gif-layers\config.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LayerError, Result};

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "GIPHY_API_KEY";

/// Default quiet period before a search request fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// GIPHY endpoint parameters
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GiphyConfig {
    /// Sticker API root, without a trailing slash
    pub base_url: String,
    pub api_key: String,
    /// Number of results requested from the trending endpoint
    pub trending_limit: u32,
    /// Number of results requested from the search endpoint
    pub search_limit: u32,
    /// Content rating filter
    pub rating: String,
    pub lang: String,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.giphy.com/v1/stickers".to_string(),
            api_key: String::new(),
            trending_limit: 50,
            search_limit: 25,
            rating: "PG-13".to_string(),
            lang: "en".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub giphy: GiphyConfig,
    /// Debounce window for search input, in milliseconds
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            giphy: GiphyConfig::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// A missing file yields defaults. A malformed file is logged and ignored
    /// so the picker still starts.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|err| {
                log::warn!("⚠️  Ignoring {}: {}", path.display(), err);
                Self::default()
            }),
            _ => Self::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key(&key);
        }

        if config.giphy.api_key.is_empty() {
            log::warn!("⚠️  No GIPHY API key configured (set {})", API_KEY_ENV);
        }

        config
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LayerError::Config(e.to_string()))
    }

    /// Override the API key; blank values are ignored
    pub fn apply_api_key(&mut self, key: &str) {
        let key = key.trim();
        if !key.is_empty() {
            self.giphy.api_key = key.to_string();
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Get the path where the config file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("gif-layers");
        path.push("config.json");
        Some(path)
    }
}
