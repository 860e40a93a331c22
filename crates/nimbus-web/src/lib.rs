pub mod camera;
pub mod frame_clock;
pub mod input;
pub mod saved_preset;
pub mod ui;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod gpu;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
mod entry {
    use crate::{app, gpu, input, saved_preset, storage};
    use nimbus_core::error::NimbusError;
    use nimbus_render::Renderer;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    const CANVAS_ID: &str = "nimbus-canvas";

    /// WASM entry point. Sets the panic hook and initializes logging.
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }
        log::info!("Nimbus starting...");

        wasm_bindgen_futures::spawn_local(async {
            if let Err(e) = run().await {
                show_error_to_user(&format!("{e}"));
            }
        });
    }

    /// Async initialization: gets canvas, computes physical size, builds the
    /// renderer and starts the frame loop.
    async fn run() -> Result<(), NimbusError> {
        let window =
            web_sys::window().ok_or_else(|| NimbusError::DomElementMissing("window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| NimbusError::DomElementMissing("document".into()))?;

        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| NimbusError::DomElementMissing(format!("#{CANVAS_ID}")))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| {
                NimbusError::DomElementMissing(format!("#{CANVAS_ID} is not a canvas"))
            })?;

        // Canvas backing store in physical pixels
        let (physical_width, physical_height, dpi_scale) =
            app::canvas_physical_size(&window, &canvas);
        canvas.set_width(physical_width);
        canvas.set_height(physical_height);

        log::info!(
            "Canvas: {}x{} CSS, {}x{} physical (DPI: {:.2})",
            canvas.client_width(),
            canvas.client_height(),
            physical_width,
            physical_height,
            dpi_scale
        );

        // Register input and resize listeners ONCE
        let input_state = Rc::new(RefCell::new(input::InputState::new()));
        input::register_input_listeners(&window, &canvas, input_state.clone()).map_err(|e| {
            NimbusError::DomElementMissing(format!("failed to add event listener: {e:?}"))
        })?;

        let gpu_ctx = gpu::init_gpu(canvas.clone(), physical_width, physical_height).await?;

        // Shader and pipeline errors surface through the validation scope.
        gpu_ctx
            .device
            .push_error_scope(wgpu::ErrorFilter::Validation);
        let renderer = Renderer::new(
            &gpu_ctx.device,
            gpu_ctx.surface_format,
            physical_width,
            physical_height,
        );
        if let Some(err) = gpu_ctx.device.pop_error_scope().await {
            return Err(NimbusError::ShaderCompilationFailed(err.to_string()));
        }

        let params = saved_preset::restore_params(storage::load_local_preset().as_deref());

        let application = app::Application::new(
            gpu_ctx,
            renderer,
            canvas,
            dpi_scale,
            input_state,
            params,
        );
        let app_rc = Rc::new(RefCell::new(application));

        app::Application::start_loop(app_rc);

        Ok(())
    }

    /// Show a user-visible error, not just a console line.
    fn show_error_to_user(msg: &str) {
        log::error!("{msg}");
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&format!("Nimbus Error: {msg}"));
        }
    }
}
