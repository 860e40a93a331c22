use glam::{Mat4, Vec3};
use nimbus_core::constants::{
    BACKGROUND_RGB, CAMERA_FAR, CAMERA_NEAR, CLOUD_BOX_SIZE, RAY_EPSILON, RAY_MAX_DISTANCE,
    RAY_MAX_STEPS,
};
use nimbus_core::math::hex_to_linear_rgb;
use nimbus_core::SceneParams;
use wgpu::util::DeviceExt;

use crate::clouds::{box_vertices, CloudUniforms};
use crate::shaders;
use crate::sky::SkyUniforms;
use crate::tonemap::{ToneMapUniforms, HDR_FORMAT};

/// GPU-uploadable per-frame uniforms. Must match FrameUniforms in frame.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub cam_to_world: [[f32; 4]; 4],
    pub cam_inv_proj: [[f32; 4]; 4],
    pub cam_pos: [f32; 3],
    pub time: f32,
    pub resolution: [f32; 2],
    pub eps: f32,
    pub max_dis: f32,
    pub max_steps: u32,
    pub _pad: [u32; 3],
}

impl FrameUniforms {
    /// Perspective camera at `eye` looking at `target` with +Y up.
    pub fn look_at(
        eye: Vec3,
        target: Vec3,
        fov_y_rad: f32,
        width: u32,
        height: u32,
        time: f32,
    ) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(fov_y_rad, w / h, CAMERA_NEAR, CAMERA_FAR);

        Self {
            view_proj: (proj * view).to_cols_array_2d(),
            cam_to_world: view.inverse().to_cols_array_2d(),
            cam_inv_proj: proj.inverse().to_cols_array_2d(),
            cam_pos: eye.to_array(),
            time,
            resolution: [w, h],
            eps: RAY_EPSILON,
            max_dis: RAY_MAX_DISTANCE,
            max_steps: RAY_MAX_STEPS,
            _pad: [0; 3],
        }
    }
}

/// Owns every GPU resource of the scene: sky, cloud volume and tone mapping.
/// All resources are created at init or on resize, never per frame.
pub struct Renderer {
    // Sky
    sky_pipeline: wgpu::RenderPipeline,
    sky_bind_group: wgpu::BindGroup,
    sky_uniform_buffer: wgpu::Buffer,
    // Cloud volume
    cloud_pipeline: wgpu::RenderPipeline,
    cloud_bind_group: wgpu::BindGroup,
    cloud_uniform_buffer: wgpu::Buffer,
    box_vertex_buffer: wgpu::Buffer,
    box_vertex_count: u32,
    // Shared frame uniforms (group 0 of sky and cloud passes)
    frame_bind_group: wgpu::BindGroup,
    frame_uniform_buffer: wgpu::Buffer,
    // HDR target
    hdr_view: wgpu::TextureView,
    // Tone mapping
    tonemap_pipeline: wgpu::RenderPipeline,
    tonemap_bind_group: wgpu::BindGroup,
    tonemap_bgl: wgpu::BindGroupLayout,
    tonemap_sampler: wgpu::Sampler,
    tonemap_uniform_buffer: wgpu::Buffer,
    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

impl Renderer {
    /// Build all GPU resources at init time.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        // -- Shader modules --
        let sky_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sky-shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::sky_source().into()),
        });

        let cloud_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cloud-shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::clouds_source().into()),
        });

        let tonemap_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tonemap-shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::tonemap_source().into()),
        });

        // -- Uniform buffers --
        let frame_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let cloud_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cloud-uniforms"),
            contents: bytemuck::bytes_of(&CloudUniforms::from_settings(&Default::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let default_params = SceneParams::default();
        let sky_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sky-uniforms"),
            contents: bytemuck::bytes_of(&SkyUniforms::from_settings(
                &default_params.sky,
                default_params.sky_sun(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let tonemap_uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tonemap-uniforms"),
                contents: bytemuck::bytes_of(&ToneMapUniforms::new(default_params.sky.exposure)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        // -- Cloud box geometry --
        let box_data = box_vertices(CLOUD_BOX_SIZE);
        let box_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cloud-box-vertices"),
            contents: bytemuck::cast_slice(&box_data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // -- Bind group layouts --
        let frame_bgl = Self::uniform_layout(
            device,
            "frame-bgl",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let sky_bgl = Self::uniform_layout(device, "sky-bgl", wgpu::ShaderStages::FRAGMENT);
        let cloud_bgl = Self::uniform_layout(device, "cloud-bgl", wgpu::ShaderStages::FRAGMENT);

        let tonemap_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tonemap-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        // -- Bind groups --
        let frame_bind_group =
            Self::uniform_bind_group(device, "frame-bg", &frame_bgl, &frame_uniform_buffer);
        let sky_bind_group =
            Self::uniform_bind_group(device, "sky-bg", &sky_bgl, &sky_uniform_buffer);
        let cloud_bind_group =
            Self::uniform_bind_group(device, "cloud-bg", &cloud_bgl, &cloud_uniform_buffer);

        let hdr_view = Self::create_hdr_target(device, width, height);

        let tonemap_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tonemap-sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let tonemap_bind_group = Self::create_tonemap_bind_group(
            device,
            &tonemap_bgl,
            &hdr_view,
            &tonemap_sampler,
            &tonemap_uniform_buffer,
        );

        // -- Sky pipeline: fullscreen triangle into the HDR target --
        let sky_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky-pipeline-layout"),
            bind_group_layouts: &[&frame_bgl, &sky_bgl],
            push_constant_ranges: &[],
        });

        let sky_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sky-pipeline"),
            layout: Some(&sky_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &sky_module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &sky_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        // -- Cloud pipeline: back faces of the box, premultiplied alpha over the sky --
        let cloud_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("cloud-pipeline-layout"),
                bind_group_layouts: &[&frame_bgl, &cloud_bgl],
                push_constant_ranges: &[],
            });

        let cloud_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cloud-pipeline"),
            layout: Some(&cloud_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &cloud_module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Front),
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &cloud_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        // -- Tone-map pipeline: HDR target -> surface --
        let tonemap_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tonemap-pipeline-layout"),
                bind_group_layouts: &[&tonemap_bgl],
                push_constant_ranges: &[],
            });

        let tonemap_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tonemap-pipeline"),
            layout: Some(&tonemap_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &tonemap_module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &tonemap_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        let [r, g, b] = hex_to_linear_rgb(BACKGROUND_RGB);
        let clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        log::info!(
            "Renderer ready: {}x{} HDR target, cloud box {} units",
            width,
            height,
            CLOUD_BOX_SIZE
        );

        Self {
            sky_pipeline,
            sky_bind_group,
            sky_uniform_buffer,
            cloud_pipeline,
            cloud_bind_group,
            cloud_uniform_buffer,
            box_vertex_buffer,
            box_vertex_count: box_data.len() as u32,
            frame_bind_group,
            frame_uniform_buffer,
            hdr_view,
            tonemap_pipeline,
            tonemap_bind_group,
            tonemap_bgl,
            tonemap_sampler,
            tonemap_uniform_buffer,
            clear_color,
            width,
            height,
        }
    }

    /// Recreate the HDR target and the tone-map bind group that samples it.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }

        self.hdr_view = Self::create_hdr_target(device, width, height);
        self.tonemap_bind_group = Self::create_tonemap_bind_group(
            device,
            &self.tonemap_bgl,
            &self.hdr_view,
            &self.tonemap_sampler,
            &self.tonemap_uniform_buffer,
        );
        self.width = width;
        self.height = height;

        log::info!("Renderer resized to {}x{}", width, height);
    }

    /// Encode sky, cloud and tone-map passes into the command encoder.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        // 1. Sky into the HDR target
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sky-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.sky_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(1, &self.sky_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        // 2. Cloud volume blended over the sky
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cloud-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.cloud_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(1, &self.cloud_bind_group, &[]);
            pass.set_vertex_buffer(0, self.box_vertex_buffer.slice(..));
            pass.draw(0..self.box_vertex_count, 0..1);
        }

        // 3. Tone map to the surface
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tonemap-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.tonemap_pipeline);
            pass.set_bind_group(0, &self.tonemap_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }

    /// Upload camera and time uniforms. Called every frame.
    pub fn update_frame(&self, queue: &wgpu::Queue, uniforms: &FrameUniforms) {
        queue.write_buffer(&self.frame_uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn update_clouds(&self, queue: &wgpu::Queue, uniforms: &CloudUniforms) {
        queue.write_buffer(&self.cloud_uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn update_sky(&self, queue: &wgpu::Queue, uniforms: &SkyUniforms) {
        queue.write_buffer(&self.sky_uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn update_tone_map(&self, queue: &wgpu::Queue, uniforms: &ToneMapUniforms) {
        queue.write_buffer(
            &self.tonemap_uniform_buffer,
            0,
            bytemuck::bytes_of(uniforms),
        );
    }

    /// Mirror applied cloud settings, sky settings and exposure into their uniform slots.
    pub fn upload_params(&self, queue: &wgpu::Queue, params: &SceneParams) {
        self.update_clouds(queue, &CloudUniforms::from_settings(params.applied_cloud()));
        self.update_sky(
            queue,
            &SkyUniforms::from_settings(&params.sky, params.sky_sun()),
        );
        self.update_tone_map(queue, &ToneMapUniforms::new(params.sky.exposure));
    }

    // -- Private helpers --

    fn uniform_layout(
        device: &wgpu::Device,
        label: &str,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    fn uniform_bind_group(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        })
    }

    fn create_hdr_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hdr-target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_tonemap_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        hdr_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        uniforms: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tonemap-bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(hdr_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniforms_size() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 240);
    }

    #[test]
    fn test_look_at_matrices() {
        let eye = Vec3::new(0.0, 0.0, 200.0);
        let u = FrameUniforms::look_at(eye, Vec3::ZERO, 30f32.to_radians(), 800, 600, 1.5);

        let cam_to_world = Mat4::from_cols_array_2d(&u.cam_to_world);
        let origin = cam_to_world.transform_point3(Vec3::ZERO);
        assert!((origin - eye).length() < 1e-3);

        // Camera looks down -Z in view space, which is toward the target.
        let forward = cam_to_world.transform_vector3(-Vec3::Z);
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);

        assert_eq!(u.resolution, [800.0, 600.0]);
        assert_eq!(u.time, 1.5);
        assert_eq!(u.eps, 0.001);
        assert_eq!(u.max_dis, 1e10);
        assert_eq!(u.max_steps, 600);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let u = FrameUniforms::look_at(
            Vec3::new(30.0, 40.0, 120.0),
            Vec3::ZERO,
            30f32.to_radians(),
            1920,
            1080,
            0.0,
        );
        let clip = Mat4::from_cols_array_2d(&u.view_proj) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let u = FrameUniforms::look_at(Vec3::Z * 10.0, Vec3::ZERO, 0.5, 0, 0, 0.0);
        assert_eq!(u.resolution, [1.0, 1.0]);
        assert!(u.view_proj.iter().flatten().all(|v| v.is_finite()));
    }
}
