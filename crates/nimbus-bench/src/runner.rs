use std::time::Instant;

use glam::Vec3;
use nimbus_core::constants::CAMERA_FOV_Y_DEG;
use nimbus_core::error::NimbusError;
use nimbus_core::SceneParams;
use nimbus_render::{FrameUniforms, Renderer};

use crate::scenes::SceneConfig;

/// Offscreen target format; matches the sRGB surface the browser picks.
const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Simulated frame rate for the animation clock.
const CLOCK_HZ: f32 = 60.0;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub cloud_steps: u32,
    pub light_steps: u32,
    pub frame_count: u32,
    pub width: u32,
    pub height: u32,
    pub timings: TimingSeries,
}

/// Runs benchmarks on native GPU (not WASM).
pub struct BenchmarkRunner {
    device: wgpu::Device,
    queue: wgpu::Queue,
    frame_count: u32,
    width: u32,
    height: u32,
}

impl BenchmarkRunner {
    /// Initialize wgpu natively. Blocks on async adapter request.
    pub fn new(frame_count: u32, width: u32, height: u32) -> Result<Self, NimbusError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| NimbusError::AdapterNotFound("no suitable GPU adapter found".into()))?;

        log::info!("Benchmark adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("bench-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        ))
        .map_err(|e| NimbusError::DeviceRequestFailed(e.to_string()))?;

        Ok(Self {
            device,
            queue,
            frame_count,
            width: width.max(1),
            height: height.max(1),
        })
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, NimbusError> {
        log::info!(
            "Running scene '{}' ({} cloud steps, {} light steps)...",
            config.name,
            config.cloud.cloud_steps,
            config.cloud.light_steps
        );

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let renderer = Renderer::new(&self.device, TARGET_FORMAT, self.width, self.height);
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(NimbusError::ShaderCompilationFailed(err.to_string()));
        }

        let mut params = SceneParams::new(config.cloud, config.sky);
        renderer.upload_params(&self.queue, &params);
        params.take_dirty();

        let target = self.create_target();
        let eye = Vec3::from_array(config.camera_position);
        let look_at = Vec3::from_array(config.camera_target);
        let fov_y_rad = CAMERA_FOV_Y_DEG.to_radians();

        // Warm-up frame so pipeline creation is not timed
        self.render_frame(&renderer, &target, eye, look_at, fov_y_rad, 0.0);

        let mut frame_times = Vec::with_capacity(self.frame_count as usize);
        for frame in 0..self.frame_count {
            let time = frame as f32 / CLOCK_HZ;
            let frame_start = Instant::now();
            self.render_frame(&renderer, &target, eye, look_at, fov_y_rad, time);
            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            cloud_steps: config.cloud.cloud_steps,
            light_steps: config.cloud.light_steps,
            frame_count: self.frame_count,
            width: self.width,
            height: self.height,
            timings,
        })
    }

    /// Encode, submit and wait for one frame.
    fn render_frame(
        &self,
        renderer: &Renderer,
        target: &wgpu::TextureView,
        eye: Vec3,
        look_at: Vec3,
        fov_y_rad: f32,
        time: f32,
    ) {
        let uniforms =
            FrameUniforms::look_at(eye, look_at, fov_y_rad, self.width, self.height, time);
        renderer.update_frame(&self.queue, &uniforms);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("bench-encoder"),
            });
        renderer.render(&mut encoder, target);
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }

    /// Offscreen color target standing in for the browser surface.
    fn create_target(&self) -> wgpu::TextureView {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("bench-target"),
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Compute timing statistics from a list of frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_timings_are_zero() {
        let t = compute_timings(&[]);
        assert_eq!(t.mean_ms, 0.0);
        assert_eq!(t.max_ms, 0.0);
    }

    #[test]
    fn test_odd_and_even_median() {
        assert_eq!(compute_timings(&[3.0, 1.0, 2.0]).median_ms, 2.0);
        assert_eq!(compute_timings(&[4.0, 1.0, 3.0, 2.0]).median_ms, 2.5);
    }

    #[test]
    fn test_percentiles_over_hundred_frames() {
        let times: Vec<f64> = (1..=100).map(f64::from).collect();
        let t = compute_timings(&times);
        assert!((t.mean_ms - 50.5).abs() < 1e-9);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 100.0);
        // ceil(95) -> index 95 -> value 96
        assert_eq!(t.p95_ms, 96.0);
        assert_eq!(t.p99_ms, 100.0);
    }

    #[test]
    fn test_single_frame() {
        let t = compute_timings(&[7.5]);
        assert_eq!(t.median_ms, 7.5);
        assert_eq!(t.p99_ms, 7.5);
    }
}
