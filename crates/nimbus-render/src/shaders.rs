//! WGSL source composition. Shared constants are injected from Rust so the
//! shaders never hardcode scene dimensions.

use nimbus_core::constants::CLOUD_BOX_SIZE;

const FRAME_WGSL: &str = include_str!("../../../shaders/common/frame.wgsl");
const NOISE_WGSL: &str = include_str!("../../../shaders/common/noise.wgsl");
const SKY_WGSL: &str = include_str!("../../../shaders/render/sky.wgsl");
const CLOUDS_WGSL: &str = include_str!("../../../shaders/render/clouds.wgsl");
const TONEMAP_WGSL: &str = include_str!("../../../shaders/render/tonemap.wgsl");

fn constants_preamble() -> String {
    format!("const BOX_HALF_SIZE: f32 = {:?};\n", CLOUD_BOX_SIZE / 2.0)
}

/// Sky pass: constants + frame uniforms + sky.
pub fn sky_source() -> String {
    format!("{}\n{FRAME_WGSL}\n{SKY_WGSL}", constants_preamble())
}

/// Cloud pass: constants + frame uniforms + noise + raymarch.
pub fn clouds_source() -> String {
    format!(
        "{}\n{FRAME_WGSL}\n{NOISE_WGSL}\n{CLOUDS_WGSL}",
        constants_preamble()
    )
}

/// Tone-mapping pass is self-contained.
pub fn tonemap_source() -> &'static str {
    TONEMAP_WGSL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_is_float_literal() {
        assert_eq!(constants_preamble(), "const BOX_HALF_SIZE: f32 = 50.0;\n");
    }

    #[test]
    fn test_composed_sources_include_entry_points() {
        for src in [sky_source(), clouds_source(), tonemap_source().to_string()] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
        assert!(clouds_source().contains("fn fbm"));
        assert!(!sky_source().contains("fn fbm"));
    }
}
