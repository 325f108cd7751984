/// Persisted placement of one overlay
///
/// This is the only storage shape: a flat map with a string URL and scalar
/// coordinates. The older nested `{url, universalLocation: {x, y}}` shape is
/// rejected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LayerError, Result};

/// Key names of the flat key-value map
pub mod keys {
    pub const URL: &str = "urlString";
    pub const SCALE: &str = "scale";
    pub const LOCATION_X: &str = "universalLocationX";
    pub const LOCATION_Y: &str = "universalLocationY";
    pub const ROTATION: &str = "rotation";
}

fn default_scale() -> f32 {
    1.0
}

/// Placement of a single overlay GIF
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformRecord {
    /// Link to the GIF
    #[serde(rename = "urlString")]
    pub url: String,

    /// Uniform scale relative to the overlay's base size
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Center x divided by the container width
    pub universal_location_x: f32,

    /// Center y divided by the container height
    pub universal_location_y: f32,

    /// Rotation in radians
    #[serde(default)]
    pub rotation: f32,
}

impl TransformRecord {
    /// Record for a freshly added overlay: unscaled, unrotated, centered
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scale: 1.0,
            universal_location_x: 0.5,
            universal_location_y: 0.5,
            rotation: 0.0,
        }
    }

    pub fn normalized_center(&self) -> (f32, f32) {
        (self.universal_location_x, self.universal_location_y)
    }

    /// Flat key-value map for host-side persistence
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(keys::URL.to_string(), Value::from(self.url.clone()));
        map.insert(keys::SCALE.to_string(), Value::from(self.scale));
        map.insert(keys::LOCATION_X.to_string(), Value::from(self.universal_location_x));
        map.insert(keys::LOCATION_Y.to_string(), Value::from(self.universal_location_y));
        map.insert(keys::ROTATION.to_string(), Value::from(self.rotation));
        map
    }

    /// Parse a map produced by [`TransformRecord::to_map`]
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        let record: Self = serde_json::from_value(Value::Object(map))
            .map_err(|e| LayerError::Record(e.to_string()))?;
        record.validate()
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let record: Self =
            serde_json::from_str(json).map_err(|e| LayerError::Record(e.to_string()))?;
        record.validate()
    }

    /// Reject records that cannot be placed
    fn validate(self) -> Result<Self> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(LayerError::Record(format!("scale must be positive, got {}", self.scale)));
        }
        if !(self.universal_location_x.is_finite()
            && self.universal_location_y.is_finite()
            && self.rotation.is_finite())
        {
            return Err(LayerError::Record("non-finite location or rotation".to_string()));
        }
        if self.url.is_empty() {
            return Err(LayerError::Record("empty url".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_centered_identity() {
        let record = TransformRecord::new("https://media.giphy.com/a.gif");
        assert_eq!(record.scale, 1.0);
        assert_eq!(record.rotation, 0.0);
        assert_eq!(record.normalized_center(), (0.5, 0.5));
    }

    #[test]
    fn test_map_uses_flat_keys() {
        let record = TransformRecord {
            url: "https://media.giphy.com/a.gif".to_string(),
            scale: 1.5,
            universal_location_x: 0.25,
            universal_location_y: 0.75,
            rotation: -0.5,
        };
        let map = record.to_map();

        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["rotation", "scale", "universalLocationX", "universalLocationY", "urlString"]
        );
        assert_eq!(TransformRecord::from_map(map).unwrap(), record);
    }

    #[test]
    fn test_json_matches_map_shape() {
        let record = TransformRecord::new("https://media.giphy.com/b.gif");
        let json: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json, Value::Object(record.to_map()));
    }

    #[test]
    fn test_legacy_nested_shape_is_rejected() {
        let legacy = r#"{
            "url": "https://media.giphy.com/a.gif",
            "scale": 1.0,
            "universalLocation": { "x": 0.5, "y": 0.5 },
            "rotation": 0.0
        }"#;
        assert!(matches!(
            TransformRecord::from_json(legacy),
            Err(LayerError::Record(_))
        ));
    }

    #[test]
    fn test_missing_scale_defaults_to_one() {
        let json = r#"{"urlString": "https://x/a.gif", "universalLocationX": 0.1, "universalLocationY": 0.2}"#;
        let record = TransformRecord::from_json(json).unwrap();
        assert_eq!(record.scale, 1.0);
        assert_eq!(record.rotation, 0.0);
    }

    #[test]
    fn test_non_positive_scale_is_rejected() {
        let mut map = TransformRecord::new("https://x/a.gif").to_map();
        map.insert(keys::SCALE.to_string(), Value::from(0.0));
        assert!(TransformRecord::from_map(map).is_err());
    }
}
