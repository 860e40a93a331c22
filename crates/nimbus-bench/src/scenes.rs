use nimbus_core::constants::{CAMERA_START_DISTANCE, CLOUD_BOX_SIZE};
use nimbus_core::{CloudSettings, SkySettings};

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub cloud: CloudSettings,
    pub sky: SkySettings,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
}

/// Return the standard suite of benchmark scenes, from a cheap raymarch up to
/// the heaviest step counts the panel allows.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let outside = [0.0, 0.0, CAMERA_START_DISTANCE];
    let origin = [0.0, 0.0, 0.0];
    // Inside the volume, looking at the far wall
    let inside = [0.0, 0.0, CLOUD_BOX_SIZE * 0.25];

    vec![
        SceneConfig {
            name: "low",
            cloud: CloudSettings {
                cloud_steps: 32,
                cloud_step_delta: 4.0,
                light_steps: 4,
                ..Default::default()
            },
            sky: SkySettings::default(),
            camera_position: outside,
            camera_target: origin,
        },
        SceneConfig {
            name: "default",
            cloud: CloudSettings::default(),
            sky: SkySettings::default(),
            camera_position: outside,
            camera_target: origin,
        },
        SceneConfig {
            name: "dense",
            cloud: CloudSettings {
                density_threshold: 0.0,
                transmittance_threshold: 0.0,
                ..Default::default()
            },
            sky: SkySettings::default(),
            camera_position: outside,
            camera_target: origin,
        },
        SceneConfig {
            name: "high",
            cloud: CloudSettings {
                cloud_steps: 256,
                cloud_step_delta: 1.0,
                light_steps: 32,
                light_step_delta: 2.0,
                ..Default::default()
            },
            sky: SkySettings::default(),
            camera_position: outside,
            camera_target: origin,
        },
        SceneConfig {
            name: "inside",
            cloud: CloudSettings::default(),
            sky: SkySettings::default(),
            camera_position: inside,
            camera_target: origin,
        },
    ]
}
