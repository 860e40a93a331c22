use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::PRESET_VERSION;
use crate::settings::{CloudSettings, SkySettings};

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Failed to parse preset RON: {0}")]
    ParseError(String),
    #[error("Failed to serialize preset: {0}")]
    SerializeError(String),
    #[error("Unsupported preset version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// A complete, shareable set of scene parameters.
///
/// Missing setting fields fall back to their defaults, the version is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub version: u32,
    #[serde(default)]
    pub cloud: CloudSettings,
    #[serde(default)]
    pub sky: SkySettings,
}

impl Preset {
    pub fn new(cloud: CloudSettings, sky: SkySettings) -> Self {
        Self {
            version: PRESET_VERSION,
            cloud,
            sky,
        }
    }

    /// Parse a preset and force all values into range.
    pub fn from_ron(ron_str: &str) -> Result<Self, PresetError> {
        let options = ron::Options::default();
        let mut preset: Preset = options
            .from_str(ron_str)
            .map_err(|e| PresetError::ParseError(e.to_string()))?;

        if preset.version != PRESET_VERSION {
            return Err(PresetError::UnsupportedVersion {
                found: preset.version,
                expected: PRESET_VERSION,
            });
        }

        preset.cloud.sanitize();
        preset.sky.sanitize();
        Ok(preset)
    }

    pub fn to_ron(&self) -> Result<String, PresetError> {
        let config = ron::ser::PrettyConfig::default();
        ron::ser::to_string_pretty(self, config)
            .map_err(|e| PresetError::SerializeError(e.to_string()))
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new(CloudSettings::default(), SkySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_then_import_preserves_values() {
        let mut preset = Preset::default();
        preset.cloud.sun_color = [255, 10, 0];
        preset.cloud.light_steps = 32;
        preset.sky.rayleigh = 1.25;

        let text = preset.to_ron().expect("serialize");
        let back = Preset::from_ron(&text).expect("parse");
        assert_eq!(back, preset);
    }

    #[test]
    fn test_partial_preset_uses_defaults() {
        let text = "(version: 1, cloud: (sun_strength: 75.0))";
        let preset = Preset::from_ron(text).expect("parse");
        assert_eq!(preset.cloud.sun_strength, 75.0);
        assert_eq!(preset.cloud.cloud_steps, 128);
        assert_eq!(preset.sky, SkySettings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let text = "(version: 1, cloud: (cloud_steps: 4096, density_threshold: -2.0), sky: (turbidity: 99.0))";
        let preset = Preset::from_ron(text).expect("parse");
        assert_eq!(preset.cloud.cloud_steps, 256);
        assert_eq!(preset.cloud.density_threshold, 0.0);
        assert_eq!(preset.sky.turbidity, 20.0);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = Preset::from_ron("(version: 7)").unwrap_err();
        assert!(matches!(
            err,
            PresetError::UnsupportedVersion {
                found: 7,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_missing_version_rejected() {
        let err = Preset::from_ron("(cloud: ())").unwrap_err();
        assert!(matches!(err, PresetError::ParseError(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            Preset::from_ron("not a preset"),
            Err(PresetError::ParseError(_))
        ));
    }
}
