use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Inclusive slider range for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    /// Slider step. `None` lets the panel pick a continuous step.
    pub step: Option<f64>,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            step: None,
        }
    }

    pub const fn stepped(min: f32, max: f32, step: f64) -> Self {
        Self {
            min,
            max,
            step: Some(step),
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Replace non-finite values with `fallback`, then clamp into range.
    pub fn sanitize(&self, value: f32, fallback: f32) -> f32 {
        let v = if value.is_finite() { value } else { fallback };
        v.clamp(self.min, self.max)
    }

    /// Clamp an integer parameter. The range bounds are whole numbers.
    pub fn sanitize_u32(&self, value: u32) -> u32 {
        value.clamp(self.min as u32, self.max as u32)
    }
}

/// Cloud parameter ranges as exposed by the panel.
pub mod cloud_ranges {
    use super::*;

    pub const SUN_THETA: ParamRange = ParamRange::new(0.0, TAU);
    pub const SUN_PHI: ParamRange = ParamRange::new(-FRAC_PI_2, FRAC_PI_2);
    pub const SUN_STRENGTH: ParamRange = ParamRange::new(0.0, 100.0);
    pub const AMBIENT_STRENGTH: ParamRange = ParamRange::new(0.0, 1.0);
    pub const SHAPE_SIZE: ParamRange = ParamRange::new(0.0, 0.1);
    pub const DENSITY_THRESHOLD: ParamRange = ParamRange::new(0.0, 0.3);
    pub const TRANSMITTANCE_THRESHOLD: ParamRange = ParamRange::new(0.0, 0.5);
    pub const CLOUD_STEPS: ParamRange = ParamRange::new(0.0, 256.0);
    pub const CLOUD_STEP_DELTA: ParamRange = ParamRange::new(0.0, 10.0);
    pub const LIGHT_STEPS: ParamRange = ParamRange::new(0.0, 256.0);
    pub const LIGHT_STEP_DELTA: ParamRange = ParamRange::new(0.0, 10.0);
}

/// Sky parameter ranges as exposed by the panel.
pub mod sky_ranges {
    use super::*;

    pub const TURBIDITY: ParamRange = ParamRange::stepped(0.0, 20.0, 0.1);
    pub const RAYLEIGH: ParamRange = ParamRange::stepped(0.0, 4.0, 0.001);
    pub const MIE_COEFFICIENT: ParamRange = ParamRange::stepped(0.0, 0.1, 0.001);
    pub const MIE_DIRECTIONAL_G: ParamRange = ParamRange::stepped(0.0, 1.0, 0.001);
    pub const EXPOSURE: ParamRange = ParamRange::stepped(0.0, 1.0, 0.0001);
}

/// Cloud rendering parameters. Angles are radians, colour is 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    pub sun_theta: f32,
    pub sun_phi: f32,
    pub sun_color: [u8; 3],
    pub sun_strength: f32,
    pub ambient_strength: f32,
    pub shape_size: f32,
    pub density_threshold: f32,
    pub transmittance_threshold: f32,
    pub cloud_steps: u32,
    pub cloud_step_delta: f32,
    pub light_steps: u32,
    pub light_step_delta: f32,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            sun_theta: 0.74,
            sun_phi: 1.5,
            sun_color: [204, 170, 122],
            sun_strength: 50.0,
            ambient_strength: 0.1,
            shape_size: 0.03,
            density_threshold: 0.02,
            transmittance_threshold: 0.05,
            cloud_steps: 128,
            cloud_step_delta: 2.0,
            light_steps: 10,
            light_step_delta: 4.0,
        }
    }
}

impl CloudSettings {
    /// Force every field into its panel range.
    pub fn sanitize(&mut self) {
        use cloud_ranges::*;
        let d = Self::default();
        self.sun_theta = SUN_THETA.sanitize(self.sun_theta, d.sun_theta);
        self.sun_phi = SUN_PHI.sanitize(self.sun_phi, d.sun_phi);
        self.sun_strength = SUN_STRENGTH.sanitize(self.sun_strength, d.sun_strength);
        self.ambient_strength =
            AMBIENT_STRENGTH.sanitize(self.ambient_strength, d.ambient_strength);
        self.shape_size = SHAPE_SIZE.sanitize(self.shape_size, d.shape_size);
        self.density_threshold =
            DENSITY_THRESHOLD.sanitize(self.density_threshold, d.density_threshold);
        self.transmittance_threshold = TRANSMITTANCE_THRESHOLD
            .sanitize(self.transmittance_threshold, d.transmittance_threshold);
        self.cloud_steps = CLOUD_STEPS.sanitize_u32(self.cloud_steps);
        self.cloud_step_delta =
            CLOUD_STEP_DELTA.sanitize(self.cloud_step_delta, d.cloud_step_delta);
        self.light_steps = LIGHT_STEPS.sanitize_u32(self.light_steps);
        self.light_step_delta =
            LIGHT_STEP_DELTA.sanitize(self.light_step_delta, d.light_step_delta);
    }

    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// Worst-case density samples per pixel (cloud steps times light steps per sample).
    pub fn max_samples_per_pixel(&self) -> u32 {
        self.cloud_steps * (1 + self.light_steps)
    }
}

/// Atmospheric sky and tone-mapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkySettings {
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub exposure: f32,
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 3.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.7,
            exposure: 0.15,
        }
    }
}

impl SkySettings {
    pub fn sanitize(&mut self) {
        use sky_ranges::*;
        let d = Self::default();
        self.turbidity = TURBIDITY.sanitize(self.turbidity, d.turbidity);
        self.rayleigh = RAYLEIGH.sanitize(self.rayleigh, d.rayleigh);
        self.mie_coefficient = MIE_COEFFICIENT.sanitize(self.mie_coefficient, d.mie_coefficient);
        self.mie_directional_g =
            MIE_DIRECTIONAL_G.sanitize(self.mie_directional_g, d.mie_directional_g);
        self.exposure = EXPOSURE.sanitize(self.exposure, d.exposure);
    }

    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_defaults() {
        let c = CloudSettings::default();
        assert_eq!(c.sun_theta, 0.74);
        assert_eq!(c.sun_phi, 1.5);
        assert_eq!(c.sun_color, [204, 170, 122]);
        assert_eq!(c.sun_strength, 50.0);
        assert_eq!(c.ambient_strength, 0.1);
        assert_eq!(c.shape_size, 0.03);
        assert_eq!(c.density_threshold, 0.02);
        assert_eq!(c.transmittance_threshold, 0.05);
        assert_eq!(c.cloud_steps, 128);
        assert_eq!(c.cloud_step_delta, 2.0);
        assert_eq!(c.light_steps, 10);
        assert_eq!(c.light_step_delta, 4.0);
    }

    #[test]
    fn test_sky_defaults() {
        let s = SkySettings::default();
        assert_eq!(s.turbidity, 10.0);
        assert_eq!(s.rayleigh, 3.0);
        assert_eq!(s.mie_coefficient, 0.005);
        assert_eq!(s.mie_directional_g, 0.7);
        assert_eq!(s.exposure, 0.15);
    }

    #[test]
    fn test_defaults_are_in_range() {
        assert_eq!(CloudSettings::default().sanitized(), CloudSettings::default());
        assert_eq!(SkySettings::default().sanitized(), SkySettings::default());
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut c = CloudSettings {
            sun_phi: 3.0,
            shape_size: -1.0,
            cloud_steps: 10_000,
            light_step_delta: 42.0,
            ..Default::default()
        };
        c.sanitize();
        assert_eq!(c.sun_phi, std::f32::consts::FRAC_PI_2);
        assert_eq!(c.shape_size, 0.0);
        assert_eq!(c.cloud_steps, 256);
        assert_eq!(c.light_step_delta, 10.0);
    }

    #[test]
    fn test_sanitize_replaces_non_finite() {
        let mut c = CloudSettings {
            sun_strength: f32::NAN,
            density_threshold: f32::INFINITY,
            ..Default::default()
        };
        c.sanitize();
        assert_eq!(c.sun_strength, 50.0);
        assert_eq!(c.density_threshold, 0.02);

        let mut s = SkySettings {
            exposure: f32::NEG_INFINITY,
            turbidity: 25.0,
            ..Default::default()
        };
        s.sanitize();
        assert_eq!(s.exposure, 0.15);
        assert_eq!(s.turbidity, 20.0);
    }

    #[test]
    fn test_range_contains() {
        assert!(cloud_ranges::SUN_THETA.contains(0.0));
        assert!(cloud_ranges::SUN_THETA.contains(TAU));
        assert!(!cloud_ranges::SUN_PHI.contains(2.0));
        assert_eq!(sky_ranges::EXPOSURE.step, Some(0.0001));
    }

    #[test]
    fn test_max_samples_per_pixel() {
        assert_eq!(CloudSettings::default().max_samples_per_pixel(), 128 * 11);
    }
}
