use glam::Vec3;

/// Point on a sphere from polar angle `phi` (measured from +Y) and azimuth
/// `theta` (measured from +Z toward +X).
pub fn spherical_to_cartesian(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi_radius = phi.sin() * radius;
    Vec3::new(
        sin_phi_radius * theta.sin(),
        phi.cos() * radius,
        sin_phi_radius * theta.cos(),
    )
}

/// Inverse of [`spherical_to_cartesian`]. Returns `(radius, phi, theta)`.
/// A zero vector maps to all zeros.
pub fn cartesian_to_spherical(v: Vec3) -> (f32, f32, f32) {
    let radius = v.length();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let theta = v.x.atan2(v.z);
    let phi = (v.y / radius).clamp(-1.0, 1.0).acos();
    (radius, phi, theta)
}

/// Unit sun direction for the given angles.
pub fn sun_direction(phi: f32, theta: f32) -> Vec3 {
    spherical_to_cartesian(1.0, phi, theta)
}

/// Convert an 8-bit-per-channel colour to the 0..1 range used by shaders.
pub fn rgb8_to_unit(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

/// sRGB transfer function inverse for a single channel.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode a 0xRRGGBB sRGB hex colour into linear RGB.
pub fn hex_to_linear_rgb(hex: u32) -> [f32; 3] {
    let r = ((hex >> 16) & 0xFF) as u8;
    let g = ((hex >> 8) & 0xFF) as u8;
    let b = (hex & 0xFF) as u8;
    rgb8_to_unit([r, g, b]).map(srgb_to_linear)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_sun_on_horizon_faces_plus_z() {
        assert!(approx(sun_direction(FRAC_PI_2, 0.0), Vec3::Z));
    }

    #[test]
    fn test_sun_at_zenith() {
        assert!(approx(sun_direction(0.0, 1.234), Vec3::Y));
    }

    #[test]
    fn test_sun_azimuth_quarter_turn_faces_plus_x() {
        assert!(approx(sun_direction(FRAC_PI_2, FRAC_PI_2), Vec3::X));
    }

    #[test]
    fn test_sun_direction_is_unit() {
        for i in 0..16 {
            let phi = -FRAC_PI_2 + i as f32 * PI / 15.0;
            let theta = i as f32 * 2.0 * PI / 15.0;
            let len = sun_direction(phi, theta).length();
            assert!((len - 1.0).abs() < 1e-5, "len {len} for phi {phi}");
        }
    }

    #[test]
    fn test_spherical_inverse() {
        let v = spherical_to_cartesian(200.0, 1.1, -0.7);
        let (r, phi, theta) = cartesian_to_spherical(v);
        assert!((r - 200.0).abs() < 1e-3);
        assert!((phi - 1.1).abs() < 1e-5);
        assert!((theta + 0.7).abs() < 1e-5);
        assert_eq!(cartesian_to_spherical(Vec3::ZERO), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_default_sun_colour() {
        let c = rgb8_to_unit([204, 170, 122]);
        assert!((c[0] - 0.8).abs() < 1e-6);
        assert!((c[1] - 2.0 / 3.0).abs() < 1e-6);
        assert!((c[2] - 122.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_hex_decoding() {
        assert_eq!(hex_to_linear_rgb(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear_rgb(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
        let bg = hex_to_linear_rgb(0xbfd1e5);
        assert!(bg[0] < bg[1] && bg[1] < bg[2]);
    }
}
