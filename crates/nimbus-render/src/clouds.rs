use glam::Vec3;
use nimbus_core::math::{rgb8_to_unit, sun_direction};
use nimbus_core::CloudSettings;

/// GPU cloud uniforms (64 bytes, matches CloudUniforms in clouds.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CloudUniforms {
    pub sun_direction: [f32; 3],
    pub sun_strength: f32,
    pub sun_color: [f32; 3],
    pub ambient_strength: f32,
    pub shape_size: f32,
    pub density_threshold: f32,
    pub transmittance_threshold: f32,
    pub cloud_steps: u32,
    pub cloud_step_delta: f32,
    pub light_steps: u32,
    pub light_step_delta: f32,
    pub _pad: f32,
}

impl CloudUniforms {
    /// Mirror the settings one-to-one into uniform slots.
    pub fn from_settings(settings: &CloudSettings) -> Self {
        Self {
            sun_direction: sun_direction(settings.sun_phi, settings.sun_theta).to_array(),
            sun_strength: settings.sun_strength,
            sun_color: rgb8_to_unit(settings.sun_color),
            ambient_strength: settings.ambient_strength,
            shape_size: settings.shape_size,
            density_threshold: settings.density_threshold,
            transmittance_threshold: settings.transmittance_threshold,
            cloud_steps: settings.cloud_steps,
            cloud_step_delta: settings.cloud_step_delta,
            light_steps: settings.light_steps,
            light_step_delta: settings.light_step_delta,
            _pad: 0.0,
        }
    }
}

/// Triangle list for an axis-aligned cube of edge `size` centred at the origin.
/// Faces wind counter-clockwise when seen from outside.
pub fn box_vertices(size: f32) -> Vec<[f32; 3]> {
    let h = size / 2.0;
    // (outward normal, u, v) with u x v = normal
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in faces {
        let corner = |su: f32, sv: f32| ((n + u * su + v * sv) * h).to_array();
        let a = corner(-1.0, -1.0);
        let b = corner(1.0, -1.0);
        let c = corner(1.0, 1.0);
        let d = corner(-1.0, 1.0);
        vertices.extend_from_slice(&[a, b, c, a, c, d]);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_uniforms_size() {
        assert_eq!(std::mem::size_of::<CloudUniforms>(), 64);
    }

    #[test]
    fn test_defaults_mirror_settings() {
        let s = CloudSettings::default();
        let u = CloudUniforms::from_settings(&s);
        assert_eq!(u.sun_strength, 50.0);
        assert_eq!(u.ambient_strength, 0.1);
        assert_eq!(u.shape_size, 0.03);
        assert_eq!(u.density_threshold, 0.02);
        assert_eq!(u.cloud_steps, 128);
        assert_eq!(u.cloud_step_delta, 2.0);
        assert_eq!(u.light_steps, 10);
        assert_eq!(u.light_step_delta, 4.0);
        assert!((u.sun_color[0] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_transmittance_threshold_is_not_density_threshold() {
        let u = CloudUniforms::from_settings(&CloudSettings::default());
        assert_eq!(u.transmittance_threshold, 0.05);
    }

    #[test]
    fn test_sun_direction_from_angles() {
        let s = CloudSettings {
            sun_phi: std::f32::consts::FRAC_PI_2,
            sun_theta: std::f32::consts::FRAC_PI_2,
            ..Default::default()
        };
        let d = Vec3::from_array(CloudUniforms::from_settings(&s).sun_direction);
        assert!((d - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_box_geometry() {
        let verts = box_vertices(100.0);
        assert_eq!(verts.len(), 36);
        assert!(verts
            .iter()
            .flatten()
            .all(|c| (c.abs() - 50.0).abs() < 1e-4));
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let verts = box_vertices(2.0);
        for tri in verts.chunks(3) {
            let a = Vec3::from_array(tri[0]);
            let b = Vec3::from_array(tri[1]);
            let c = Vec3::from_array(tri[2]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }
}
