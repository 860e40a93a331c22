use nimbus_core::{Preset, SceneParams};

/// Scene parameters to start with, given the preset text kept in local storage.
/// Missing or unreadable text falls back to the defaults.
pub fn restore_params(saved: Option<&str>) -> SceneParams {
    let Some(text) = saved else {
        return SceneParams::default();
    };
    match Preset::from_ron(text) {
        Ok(preset) => {
            log::info!("Restored preset from local storage");
            SceneParams::from_preset(&preset)
        }
        Err(e) => {
            log::warn!("Ignoring saved preset: {e}");
            SceneParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::{CloudSettings, SkySettings};

    #[test]
    fn test_nothing_saved_gives_defaults() {
        let params = restore_params(None);
        assert_eq!(params.applied_preset(), SceneParams::default().applied_preset());
    }

    #[test]
    fn test_corrupt_text_gives_defaults() {
        for text in ["", "not ron at all", "(version: 1, cloud: (density: "] {
            let params = restore_params(Some(text));
            assert_eq!(params.applied_preset(), SceneParams::default().applied_preset());
        }
    }

    #[test]
    fn test_saved_preset_is_applied() {
        let mut sky = SkySettings::default();
        sky.turbidity = 4.0;
        let preset = Preset::new(CloudSettings::default(), sky);
        let text = preset.to_ron().unwrap();

        let params = restore_params(Some(text.as_str()));
        assert_eq!(params.applied_preset().sky.turbidity, 4.0);
    }
}
