use glam::Vec3;

use crate::math::sun_direction;
use crate::preset::Preset;
use crate::settings::{CloudSettings, SkySettings};

/// Parameter store shared by the panel and the renderer.
///
/// Cloud settings are edited in a staged copy and only reach the GPU when
/// [`SceneParams::update_cloud`] commits them. Sky settings apply on every
/// change. The sky's sun follows the cloud sun angles.
#[derive(Debug, Clone)]
pub struct SceneParams {
    /// Cloud settings bound to the panel.
    pub cloud: CloudSettings,
    /// Sky settings bound to the panel.
    pub sky: SkySettings,
    applied_cloud: CloudSettings,
    sky_sun: Vec3,
    dirty: bool,
}

impl SceneParams {
    pub fn new(cloud: CloudSettings, sky: SkySettings) -> Self {
        let cloud = cloud.sanitized();
        Self {
            cloud,
            sky: sky.sanitized(),
            applied_cloud: cloud,
            sky_sun: sun_direction(cloud.sun_phi, cloud.sun_theta),
            dirty: true,
        }
    }

    pub fn from_preset(preset: &Preset) -> Self {
        Self::new(preset.cloud, preset.sky)
    }

    /// Commit staged cloud settings and move the sky sun to match.
    pub fn update_cloud(&mut self) {
        self.cloud.sanitize();
        self.applied_cloud = self.cloud;
        self.sky_sun = sun_direction(self.applied_cloud.sun_phi, self.applied_cloud.sun_theta);
        self.dirty = true;
    }

    /// A sky control changed. The sky sun reads the staged cloud angles.
    pub fn sky_changed(&mut self) {
        self.sky.sanitize();
        self.sky_sun = sun_direction(self.cloud.sun_phi, self.cloud.sun_theta);
        self.dirty = true;
    }

    /// Replace both setting groups and apply them.
    pub fn load_preset(&mut self, preset: &Preset) {
        self.cloud = preset.cloud;
        self.sky = preset.sky;
        self.update_cloud();
        self.sky_changed();
    }

    pub fn reset(&mut self) {
        self.load_preset(&Preset::default());
    }

    pub fn applied_cloud(&self) -> &CloudSettings {
        &self.applied_cloud
    }

    /// Sun direction used by the applied cloud settings.
    pub fn cloud_sun(&self) -> Vec3 {
        sun_direction(self.applied_cloud.sun_phi, self.applied_cloud.sun_theta)
    }

    pub fn sky_sun(&self) -> Vec3 {
        self.sky_sun
    }

    pub fn has_pending_cloud_changes(&self) -> bool {
        self.cloud != self.applied_cloud
    }

    /// Snapshot of what is currently on the GPU.
    pub fn applied_preset(&self) -> Preset {
        Preset::new(self.applied_cloud, self.sky)
    }

    /// Returns whether uniforms need uploading and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for SceneParams {
    fn default() -> Self {
        Self::new(CloudSettings::default(), SkySettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_dirty_once() {
        let mut p = SceneParams::default();
        assert!(p.take_dirty());
        assert!(!p.take_dirty());
        assert!(!p.has_pending_cloud_changes());
    }

    #[test]
    fn test_staged_edits_do_not_apply_until_update() {
        let mut p = SceneParams::default();
        p.take_dirty();

        p.cloud.sun_strength = 80.0;
        p.cloud.cloud_steps = 64;
        assert!(p.has_pending_cloud_changes());
        assert_eq!(p.applied_cloud().sun_strength, 50.0);
        assert!(!p.take_dirty());

        p.update_cloud();
        assert!(!p.has_pending_cloud_changes());
        assert_eq!(p.applied_cloud().sun_strength, 80.0);
        assert_eq!(p.applied_cloud().cloud_steps, 64);
        assert!(p.take_dirty());
    }

    #[test]
    fn test_sky_change_uses_staged_sun_angles() {
        let mut p = SceneParams::default();
        p.cloud.sun_phi = 0.0;
        p.sky.turbidity = 4.0;
        p.sky_changed();

        assert!((p.sky_sun() - Vec3::Y).length() < 1e-5);
        // Clouds still use the applied angles.
        let applied = sun_direction(1.5, 0.74);
        assert!((p.cloud_sun() - applied).length() < 1e-5);
        assert_eq!(p.applied_preset().sky.turbidity, 4.0);
    }

    #[test]
    fn test_update_cloud_moves_sky_sun() {
        let mut p = SceneParams::default();
        p.cloud.sun_phi = std::f32::consts::FRAC_PI_2;
        p.cloud.sun_theta = 0.0;
        p.update_cloud();
        assert!((p.sky_sun() - Vec3::Z).length() < 1e-5);
        assert_eq!(p.sky_sun(), p.cloud_sun());
    }

    #[test]
    fn test_update_cloud_sanitizes() {
        let mut p = SceneParams::default();
        p.cloud.light_steps = 999;
        p.cloud.ambient_strength = f32::NAN;
        p.update_cloud();
        assert_eq!(p.applied_cloud().light_steps, 256);
        assert_eq!(p.applied_cloud().ambient_strength, 0.1);
    }

    #[test]
    fn test_load_and_reset() {
        let mut p = SceneParams::default();
        let mut preset = Preset::default();
        preset.cloud.shape_size = 0.07;
        preset.sky.exposure = 0.5;
        p.load_preset(&preset);
        assert_eq!(p.applied_cloud().shape_size, 0.07);
        assert_eq!(p.sky.exposure, 0.5);
        assert!(p.take_dirty());

        p.reset();
        assert_eq!(*p.applied_cloud(), CloudSettings::default());
        assert_eq!(p.sky, SkySettings::default());
    }
}
