//! Atmospheric sky configuration.
//! The sky is evaluated per pixel in sky.wgsl. Everything that depends only on
//! the sun and the panel settings (sun intensity, fade, scattering
//! coefficients) is computed here once per change instead of per pixel.

use glam::Vec3;
use nimbus_core::SkySettings;

/// Rayleigh total scattering coefficient for the primaries (680, 550, 450 nm).
const TOTAL_RAYLEIGH: Vec3 = Vec3::new(5.804_543e-6, 1.356_291_1e-5, 3.026_590_2e-5);

/// Mie scattering constant per primary, scaled by turbidity.
const MIE_CONST: Vec3 = Vec3::new(1.839_991_9e14, 2.779_802_4e14, 4.079_048e14);

/// Zenith angle past which the sun contributes no light (~92.3°).
const CUTOFF_ANGLE: f32 = 1.611_073_2;
const STEEPNESS: f32 = 1.5;
const SUN_ILLUMINANCE: f32 = 1000.0;

/// Radius of the virtual sky dome; sets how quickly the sky fades as the sun sets.
pub const SKY_DOME_SCALE: f32 = 450_000.0;

/// GPU sky uniforms (64 bytes, matches SkyUniforms in sky.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyUniforms {
    pub sun_direction: [f32; 3],
    pub sun_e: f32,
    pub beta_r: [f32; 3],
    pub sun_fade: f32,
    pub beta_m: [f32; 3],
    pub mie_directional_g: f32,
    pub up: [f32; 3],
    pub _pad: f32,
}

impl SkyUniforms {
    pub fn from_settings(settings: &SkySettings, sun: Vec3) -> Self {
        let sun_direction = sun.normalize_or(Vec3::Y);
        let sun_e = sun_intensity(sun_direction.dot(Vec3::Y));
        let sun_fade = sun_fade(sun);

        let rayleigh_coefficient = (settings.rayleigh - (1.0 - sun_fade)).max(0.0);
        let beta_r = TOTAL_RAYLEIGH * rayleigh_coefficient;
        let beta_m = total_mie(settings.turbidity) * settings.mie_coefficient;

        Self {
            sun_direction: sun_direction.to_array(),
            sun_e,
            beta_r: beta_r.to_array(),
            sun_fade,
            beta_m: beta_m.to_array(),
            mie_directional_g: settings.mie_directional_g,
            up: Vec3::Y.to_array(),
            _pad: 0.0,
        }
    }
}

/// Solar illuminance reaching the ground for a given cosine of the zenith angle.
pub fn sun_intensity(zenith_angle_cos: f32) -> f32 {
    let c = zenith_angle_cos.clamp(-1.0, 1.0);
    SUN_ILLUMINANCE * (1.0 - (-(CUTOFF_ANGLE - c.acos()) / STEEPNESS).exp()).max(0.0)
}

/// 1 while the sun is up, dropping toward 0 as it sinks below the dome.
pub fn sun_fade(sun: Vec3) -> f32 {
    1.0 - (1.0 - (sun.y / SKY_DOME_SCALE).exp()).clamp(0.0, 1.0)
}

/// Mie total scattering for the given turbidity.
pub fn total_mie(turbidity: f32) -> Vec3 {
    let c = 0.2 * turbidity * 10e-18;
    MIE_CONST * (0.434 * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_uniforms_size() {
        assert_eq!(std::mem::size_of::<SkyUniforms>(), 64);
    }

    #[test]
    fn test_cutoff_angle_is_pi_over_1_95() {
        assert!((CUTOFF_ANGLE - std::f32::consts::PI / 1.95).abs() < 1e-6);
    }

    #[test]
    fn test_sun_intensity_at_zenith() {
        let e = sun_intensity(1.0);
        let expected = 1000.0 * (1.0 - (-CUTOFF_ANGLE / STEEPNESS).exp());
        assert!((e - expected).abs() < 1e-3);
        assert!(e > 600.0 && e < 700.0);
    }

    #[test]
    fn test_sun_below_cutoff_is_dark() {
        assert_eq!(sun_intensity(-0.5), 0.0);
        assert_eq!(sun_intensity(-1.0), 0.0);
        assert!(sun_intensity(0.0) > 0.0);
    }

    #[test]
    fn test_sun_intensity_decreases_toward_horizon() {
        assert!(sun_intensity(1.0) > sun_intensity(0.5));
        assert!(sun_intensity(0.5) > sun_intensity(0.0));
    }

    #[test]
    fn test_unit_sun_does_not_fade() {
        assert!((sun_fade(Vec3::Y) - 1.0).abs() < 1e-5);
        assert!((sun_fade(-Vec3::Y) - 1.0).abs() < 1e-5);
        assert!(sun_fade(Vec3::new(0.0, -SKY_DOME_SCALE * 10.0, 0.0)) < 1e-3);
    }

    #[test]
    fn test_mie_scales_with_turbidity_and_coefficient() {
        let base = SkyUniforms::from_settings(&SkySettings::default(), Vec3::Y);
        let doubled = SkyUniforms::from_settings(
            &SkySettings {
                turbidity: 20.0,
                ..Default::default()
            },
            Vec3::Y,
        );
        for i in 0..3 {
            assert!((doubled.beta_m[i] / base.beta_m[i] - 2.0).abs() < 1e-4);
        }
        let none = SkyUniforms::from_settings(
            &SkySettings {
                mie_coefficient: 0.0,
                ..Default::default()
            },
            Vec3::Y,
        );
        assert_eq!(none.beta_m, [0.0; 3]);
    }

    #[test]
    fn test_rayleigh_never_negative() {
        let u = SkyUniforms::from_settings(
            &SkySettings {
                rayleigh: 0.0,
                ..Default::default()
            },
            Vec3::new(0.0, -SKY_DOME_SCALE, 0.0),
        );
        assert!(u.beta_r.iter().all(|b| *b >= 0.0));
    }

    #[test]
    fn test_sun_direction_is_normalized() {
        let u = SkyUniforms::from_settings(&SkySettings::default(), Vec3::new(0.0, 3.0, 4.0));
        let d = Vec3::from_array(u.sun_direction);
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert_eq!(u.up, [0.0, 1.0, 0.0]);
        assert_eq!(u.mie_directional_g, 0.7);
    }
}
