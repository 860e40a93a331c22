use nimbus_core::constants::STATS_WINDOW;

/// Stats overlay: adapter info, rolling frame timing, surface size and camera.
pub struct StatsPanel {
    adapter_name: String,
    backend: String,
    frame_times: [f64; STATS_WINDOW],
    frame_index: usize,
    frame_count: usize,
    avg_frame_time_ms: f64,
    resolution: [u32; 2],
    camera_pos: [f32; 3],
    samples_per_pixel: u32,
}

impl StatsPanel {
    pub fn new(adapter_name: String, backend: String) -> Self {
        Self {
            adapter_name,
            backend,
            frame_times: [0.0; STATS_WINDOW],
            frame_index: 0,
            frame_count: 0,
            avg_frame_time_ms: 0.0,
            resolution: [0, 0],
            camera_pos: [0.0; 3],
            samples_per_pixel: 0,
        }
    }

    /// Record a frame's delta time and update the rolling average.
    pub fn update(&mut self, delta_ms: f64) {
        self.frame_times[self.frame_index] = delta_ms;
        self.frame_index = (self.frame_index + 1) % STATS_WINDOW;
        self.frame_count = (self.frame_count + 1).min(STATS_WINDOW);
        let sum: f64 = self.frame_times.iter().sum();
        self.avg_frame_time_ms = sum / self.frame_count as f64;
    }

    pub fn avg_frame_time_ms(&self) -> f64 {
        self.avg_frame_time_ms
    }

    pub fn fps(&self) -> f64 {
        if self.avg_frame_time_ms > 0.0 {
            1000.0 / self.avg_frame_time_ms
        } else {
            0.0
        }
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = [width, height];
    }

    pub fn set_camera_pos(&mut self, pos: [f32; 3]) {
        self.camera_pos = pos;
    }

    pub fn set_samples_per_pixel(&mut self, samples: u32) {
        self.samples_per_pixel = samples;
    }

    pub fn show(&self, ctx: &egui::Context) {
        egui::Window::new("Stats")
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                ui.label(&self.adapter_name);
                ui.label(&self.backend);
                ui.separator();
                ui.label(format!("{:.2} ms", self.avg_frame_time_ms));
                ui.label(format!("{:.0} FPS", self.fps()));
                ui.separator();
                ui.label(format!("{} x {}", self.resolution[0], self.resolution[1]));
                ui.label(format!(
                    "Cam: ({:.1}, {:.1}, {:.1})",
                    self.camera_pos[0], self.camera_pos[1], self.camera_pos[2]
                ));
                ui.label(format!("Max samples/px: {}", self.samples_per_pixel));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> StatsPanel {
        StatsPanel::new("test".into(), "BrowserWebGpu".into())
    }

    #[test]
    fn test_average_before_window_fills() {
        let mut p = panel();
        p.update(10.0);
        p.update(20.0);
        assert!((p.avg_frame_time_ms() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_rolls_over() {
        let mut p = panel();
        for _ in 0..STATS_WINDOW {
            p.update(100.0);
        }
        for _ in 0..STATS_WINDOW {
            p.update(10.0);
        }
        assert!((p.avg_frame_time_ms() - 10.0).abs() < 1e-9);
        assert!((p.fps() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_fps_zero_without_frames() {
        assert_eq!(panel().fps(), 0.0);
    }
}
