pub mod cloud;
pub mod presets;
pub mod sky;
pub mod stats;

use egui_wgpu::ScreenDescriptor;
use nimbus_core::{ParamRange, SceneParams};

use presets::{PresetAction, PresetStatus};

/// Manages egui context and its wgpu renderer.
pub struct UiState {
    pub ctx: egui::Context,
    pub renderer: egui_wgpu::Renderer,
}

impl UiState {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, dpi_scale: f32) -> Self {
        let ctx = egui::Context::default();
        ctx.set_pixels_per_point(dpi_scale);

        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self { ctx, renderer }
    }

    pub fn screen_descriptor(&self, width: u32, height: u32) -> ScreenDescriptor {
        ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    /// Input for one egui pass over a `width` x `height` physical-pixel surface.
    pub fn raw_input(
        &self,
        width: u32,
        height: u32,
        time: f64,
        events: Vec<egui::Event>,
    ) -> egui::RawInput {
        let ppp = self.ctx.pixels_per_point();
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(width as f32 / ppp, height as f32 / ppp),
            )),
            time: Some(time),
            events,
            ..Default::default()
        }
    }
}

/// What the settings panel asked for this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PanelOutput {
    pub cloud_updated: bool,
    pub sky_changed: bool,
    pub preset: PresetAction,
}

/// Settings panel with Cloud, Sky and Presets folders, anchored top right.
pub fn show_settings(
    ctx: &egui::Context,
    params: &mut SceneParams,
    status: &PresetStatus,
) -> PanelOutput {
    let mut output = PanelOutput::default();

    egui::Window::new("Settings")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
        .resizable(false)
        .collapsible(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            egui::CollapsingHeader::new("Cloud")
                .default_open(true)
                .show(ui, |ui| {
                    output.cloud_updated = cloud::show(ui, params);
                });
            egui::CollapsingHeader::new("Sky")
                .default_open(true)
                .show(ui, |ui| {
                    output.sky_changed = sky::show(ui, params);
                });
            egui::CollapsingHeader::new("Presets")
                .default_open(false)
                .show(ui, |ui| {
                    output.preset = presets::show(ui, status);
                });
        });

    output
}

/// Labelled slider over a parameter range. Returns whether the value changed.
pub(crate) fn slider(ui: &mut egui::Ui, value: &mut f32, range: ParamRange, label: &str) -> bool {
    let mut slider = egui::Slider::new(value, range.min..=range.max).text(label);
    if let Some(step) = range.step {
        slider = slider.step_by(step);
    }
    ui.add(slider).changed()
}

/// Integer variant of [`slider`].
pub(crate) fn slider_u32(
    ui: &mut egui::Ui,
    value: &mut u32,
    range: ParamRange,
    label: &str,
) -> bool {
    ui.add(egui::Slider::new(value, range.min as u32..=range.max as u32).text(label))
        .changed()
}
