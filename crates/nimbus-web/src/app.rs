use crate::camera::OrbitCamera;
use crate::frame_clock::{FrameClock, FrameTick};
use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::storage;
use crate::ui::presets::{PresetAction, PresetStatus};
use crate::ui::stats::StatsPanel;
use crate::ui::{self, UiState};
use nimbus_core::constants::PRESET_FILE_NAME;
use nimbus_core::error::NimbusError;
use nimbus_core::{Preset, SceneParams};
use nimbus_render::Renderer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Canvas size in physical pixels from its CSS size and the device pixel ratio.
pub fn canvas_physical_size(
    window: &web_sys::Window,
    canvas: &web_sys::HtmlCanvasElement,
) -> (u32, u32, f32) {
    let dpi_scale = window.device_pixel_ratio() as f32;
    let width = (canvas.client_width() as f32 * dpi_scale) as u32;
    let height = (canvas.client_height() as f32 * dpi_scale) as u32;
    (width.max(1), height.max(1), dpi_scale)
}

/// Main application struct. Owns all subsystems.
pub struct Application {
    gpu: GpuContext,
    renderer: Renderer,
    ui_state: UiState,
    stats: StatsPanel,
    camera: OrbitCamera,
    params: SceneParams,
    input: Rc<RefCell<InputState>>,
    canvas: web_sys::HtmlCanvasElement,
    preset_status: PresetStatus,
    /// Filled by the file dialog callback, applied on the next frame.
    pending_import: Rc<RefCell<Option<Vec<u8>>>>,
    clock: FrameClock,
}

impl Application {
    pub fn new(
        gpu: GpuContext,
        renderer: Renderer,
        canvas: web_sys::HtmlCanvasElement,
        dpi_scale: f32,
        input: Rc<RefCell<InputState>>,
        params: SceneParams,
    ) -> Self {
        let ui_state = UiState::new(&gpu.device, gpu.surface_format, dpi_scale);
        let mut stats = StatsPanel::new(gpu.adapter_name.clone(), gpu.backend.clone());
        stats.set_resolution(gpu.surface_config.width, gpu.surface_config.height);

        Self {
            gpu,
            renderer,
            ui_state,
            stats,
            camera: OrbitCamera::new(),
            params,
            input,
            canvas,
            preset_status: PresetStatus::None,
            pending_import: Rc::new(RefCell::new(None)),
            clock: FrameClock::new(),
        }
    }

    /// Start the requestAnimationFrame loop.
    /// Creates the rAF closure ONCE so no closure leaks per frame.
    pub fn start_loop(app: Rc<RefCell<Self>>) {
        let closure: RafClosure = Rc::new(RefCell::new(None));
        let closure_clone = closure.clone();

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            {
                let mut app_ref = app.borrow_mut();
                if let FrameTick::Render { delta_ms, time } = app_ref.clock.tick(timestamp) {
                    if let Some(delta) = delta_ms {
                        app_ref.stats.update(delta);
                    }
                    app_ref.frame(timestamp, time);
                }
            }
            request_frame(&closure_clone);
        }) as Box<dyn FnMut(f64)>));

        request_frame(&closure);
    }

    /// Advance and draw a single frame.
    fn frame(&mut self, timestamp: f64, time: f32) {
        self.handle_resize();
        self.apply_pending_import();

        let (events, pointer_dx, pointer_dy, zoom, orbiting, panning) = {
            let mut input = self.input.borrow_mut();
            let snapshot = (
                input.take_events(),
                input.mouse_dx,
                input.mouse_dy,
                input.zoom_notches,
                input.left_button_down,
                input.middle_button_down || input.right_button_down,
            );
            input.clear_deltas();
            snapshot
        };

        let width = self.gpu.surface_config.width;
        let height = self.gpu.surface_config.height;
        let raw_input = self
            .ui_state
            .raw_input(width, height, timestamp / 1000.0, events);

        let Application {
            ui_state,
            stats,
            params,
            preset_status,
            ..
        } = self;
        let mut panel = ui::PanelOutput::default();
        let full_output = ui_state.ctx.run(raw_input, |ctx| {
            stats.show(ctx);
            panel = ui::show_settings(ctx, params, preset_status);
        });

        // Pointer gestures over egui windows belong to egui.
        let ctx = &self.ui_state.ctx;
        if !ctx.is_using_pointer() && !ctx.is_pointer_over_area() {
            let viewport_height = self.canvas.client_height() as f32;
            if orbiting {
                self.camera.orbit(pointer_dx, pointer_dy, viewport_height);
            } else if panning {
                self.camera.pan(pointer_dx, pointer_dy, viewport_height);
            }
            if zoom != 0.0 {
                self.camera.zoom(zoom);
            }
        }

        self.handle_panel(panel);

        if self.params.take_dirty() {
            self.renderer.upload_params(&self.gpu.queue, &self.params);
            self.stats
                .set_samples_per_pixel(self.params.applied_cloud().max_samples_per_pixel());
        }

        let frame_uniforms = self.camera.to_uniforms(width, height, time);
        self.renderer.update_frame(&self.gpu.queue, &frame_uniforms);
        self.stats.set_camera_pos(frame_uniforms.cam_pos);

        self.render(full_output);
    }

    fn handle_panel(&mut self, panel: ui::PanelOutput) {
        if panel.cloud_updated || panel.sky_changed {
            storage::save_local_preset(&self.params.applied_preset());
        }

        match panel.preset {
            PresetAction::None => {}
            PresetAction::Export => match self.params.applied_preset().to_ron() {
                Ok(text) => {
                    storage::save_to_file(text.as_bytes(), PRESET_FILE_NAME);
                    self.preset_status = PresetStatus::Exported;
                }
                Err(e) => self.preset_status = PresetStatus::Error(e.to_string()),
            },
            PresetAction::Import => {
                let slot = self.pending_import.clone();
                storage::load_from_file(move |bytes| {
                    *slot.borrow_mut() = Some(bytes);
                });
            }
            PresetAction::Reset => {
                self.params.reset();
                storage::clear_local_preset();
                self.preset_status = PresetStatus::Reset;
                log::info!("Scene parameters reset to defaults");
            }
        }
    }

    fn apply_pending_import(&mut self) {
        let Some(bytes) = self.pending_import.borrow_mut().take() else {
            return;
        };
        let parsed = String::from_utf8(bytes)
            .map_err(|e| e.to_string())
            .and_then(|text| Preset::from_ron(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(preset) => {
                self.params.load_preset(&preset);
                storage::save_local_preset(&preset);
                self.preset_status = PresetStatus::Imported;
                log::info!("Preset imported");
            }
            Err(msg) => {
                log::warn!("Preset import failed: {msg}");
                self.preset_status = PresetStatus::Error(msg);
            }
        }
    }

    /// Follow the canvas size after a window resize.
    fn handle_resize(&mut self) {
        if !std::mem::take(&mut self.input.borrow_mut().resized) {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let (width, height, dpi_scale) = canvas_physical_size(&window, &self.canvas);
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        self.gpu.resize(width, height);
        self.renderer.resize(&self.gpu.device, width, height);
        self.ui_state.ctx.set_pixels_per_point(dpi_scale);
        self.stats.set_resolution(width, height);
    }

    /// Record the scene and egui passes and present.
    fn render(&mut self, full_output: egui::FullOutput) {
        // Destructure self for disjoint field borrows while the egui pass is alive.
        let Application {
            gpu,
            renderer,
            ui_state,
            ..
        } = self;

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return;
            }
            Err(e) => {
                log::error!("{}", NimbusError::SurfaceTextureError(e.to_string()));
                return;
            }
        };

        let view = output.texture.create_view(&Default::default());
        let screen =
            ui_state.screen_descriptor(gpu.surface_config.width, gpu.surface_config.height);
        let clipped_primitives = ui_state
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // 1. Sky, clouds and tone mapping
        renderer.render(&mut encoder, &view);

        // 2. Upload egui textures and update buffers
        for (id, delta) in &full_output.textures_delta.set {
            ui_state
                .renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        ui_state.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &clipped_primitives,
            &screen,
        );

        // 3. egui on top of the scene
        //    forget_lifetime() moves the encoder guard to run time so the pass
        //    can outlive the borrow of the encoder.
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            ui_state
                .renderer
                .render(&mut pass, &clipped_primitives, &screen);
        }

        // 4. Free textures after rendering
        for id in &full_output.textures_delta.free {
            ui_state.renderer.free_texture(id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn request_frame(closure: &RafClosure) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(callback) = closure.borrow().as_ref() {
        if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
    }
}
