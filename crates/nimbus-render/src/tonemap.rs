/// Offscreen colour format for the sky and cloud passes before tone mapping.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Tone-mapping uniforms (16 bytes, matches ToneMapUniforms in tonemap.wgsl).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ToneMapUniforms {
    pub exposure: f32,
    pub _pad: [f32; 3],
}

impl ToneMapUniforms {
    pub fn new(exposure: f32) -> Self {
        Self {
            exposure,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_map_uniforms_size() {
        assert_eq!(std::mem::size_of::<ToneMapUniforms>(), 16);
        assert_eq!(ToneMapUniforms::new(0.15).exposure, 0.15);
    }
}
