//! Adapter configuration

use serde::{Deserialize, Serialize};

/// Numeric range the renderer expects RGBA channels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorRange {
    /// Channels in [0, 255], alpha 255 when opaque
    #[default]
    Byte,
    /// Channels in [0, 1]
    Unit,
}

/// Configuration shared by every heatmap adapter in a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Channel range written into `color_values`
    pub color_range: ColorRange,

    /// Hover mode used when a trace does not set one
    pub default_hoverinfo: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            color_range: ColorRange::Byte,
            default_hoverinfo: "all".to_string(),
        }
    }
}

impl AdapterConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
