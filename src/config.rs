//! YAML conversion settings.
//!
//! ```yaml
//! width_px: 24
//! clip_policy: symmetric      # or source-compatible
//! pixel_mode: subpixel        # or integer
//! class_id: 0
//! ```
//!
//! Every key is optional. Command-line flags override the file, and the file
//! overrides built-in defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::conversion::ConvertOptions;
use crate::error::AnnoboxError;
use crate::geom::{ClipPolicy, PixelMode};

/// Conversion settings as read from a config file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    pub width_px: Option<f64>,
    pub clip_policy: Option<ClipPolicy>,
    pub pixel_mode: Option<PixelMode>,
    pub class_id: Option<u32>,
}

impl ConvertConfig {
    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self, AnnoboxError> {
        let raw = fs::read_to_string(path).map_err(AnnoboxError::Io)?;
        serde_yaml::from_str(&raw).map_err(|source| AnnoboxError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layers `overrides` on top of this config; set fields in `overrides` win.
    pub fn merge(self, overrides: ConvertConfig) -> Self {
        Self {
            width_px: overrides.width_px.or(self.width_px),
            clip_policy: overrides.clip_policy.or(self.clip_policy),
            pixel_mode: overrides.pixel_mode.or(self.pixel_mode),
            class_id: overrides.class_id.or(self.class_id),
        }
    }

    /// Fills unset fields with defaults.
    pub fn into_options(self) -> ConvertOptions {
        let defaults = ConvertOptions::default();
        let mut options = defaults;
        options.segment.width_px = self.width_px.unwrap_or(defaults.segment.width_px);
        options.segment.clip_policy = self.clip_policy.unwrap_or(defaults.segment.clip_policy);
        options.segment.pixel_mode = self.pixel_mode.unwrap_or(defaults.segment.pixel_mode);
        options.class_id = self.class_id.unwrap_or(defaults.class_id);
        options
    }
}
