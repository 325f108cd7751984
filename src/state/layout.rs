/// Saved overlay layouts
///
/// A layout is the ordered list of transform records plus a timestamp,
/// stored as pretty JSON:
/// - Linux: ~/.local/share/gif-layers/layout.json
/// - macOS: ~/Library/Application Support/gif-layers/layout.json
/// - Windows: %APPDATA%\gif-layers\layout.json

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::record::TransformRecord;
use crate::error::{LayerError, Result};

/// Current on-disk format version
pub const LAYOUT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayoutDocument {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub records: Vec<TransformRecord>,
}

impl LayoutDocument {
    pub fn new(records: Vec<TransformRecord>) -> Self {
        Self {
            version: LAYOUT_VERSION,
            saved_at: Utc::now(),
            records,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayerError::Layout(e.to_string()))
    }

    /// Parse and validate a layout; every record must be placeable
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(json).map_err(|e| LayerError::Layout(e.to_string()))?;

        let version = raw.get("version").and_then(|v| v.as_u64());
        if version != Some(u64::from(LAYOUT_VERSION)) {
            return Err(LayerError::Layout(format!(
                "unsupported layout version {:?}",
                version
            )));
        }

        let document: Self =
            serde_json::from_value(raw).map_err(|e| LayerError::Layout(e.to_string()))?;

        // Re-check each record through the same validation as the map path
        for record in &document.records {
            TransformRecord::from_map(record.to_map())?;
        }

        Ok(document)
    }

    /// Get the default layout file path
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("gif-layers");
        path.push("layout.json");
        Some(path)
    }

    /// Write to `path`, creating the parent directory
    pub async fn save(&self, path: PathBuf) -> Result<PathBuf> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, json).await?;
        log::info!("💾 Saved {} overlays to {}", self.records.len(), path.display());
        Ok(path)
    }

    pub async fn load(path: PathBuf) -> Result<Self> {
        let json = tokio::fs::read_to_string(&path).await?;
        let document = Self::from_json(&json)?;
        log::info!("📂 Loaded {} overlays from {}", document.records.len(), path.display());
        Ok(document)
    }
}
