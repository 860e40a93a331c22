use nimbus_core::settings::cloud_ranges;
use nimbus_core::SceneParams;

use super::{slider, slider_u32};

/// Cloud folder. Edits the staged settings; returns true when "Update Cloud"
/// committed them.
pub fn show(ui: &mut egui::Ui, params: &mut SceneParams) -> bool {
    let cloud = &mut params.cloud;

    ui.label("Sun");
    slider(ui, &mut cloud.sun_theta, cloud_ranges::SUN_THETA, "theta");
    slider(ui, &mut cloud.sun_phi, cloud_ranges::SUN_PHI, "phi");
    ui.horizontal(|ui| {
        ui.color_edit_button_srgb(&mut cloud.sun_color);
        ui.label("color");
    });
    slider(ui, &mut cloud.sun_strength, cloud_ranges::SUN_STRENGTH, "strength");
    slider(
        ui,
        &mut cloud.ambient_strength,
        cloud_ranges::AMBIENT_STRENGTH,
        "ambient",
    );

    ui.separator();
    ui.label("Shape");
    slider(ui, &mut cloud.shape_size, cloud_ranges::SHAPE_SIZE, "size");
    slider(
        ui,
        &mut cloud.density_threshold,
        cloud_ranges::DENSITY_THRESHOLD,
        "density threshold",
    );
    slider(
        ui,
        &mut cloud.transmittance_threshold,
        cloud_ranges::TRANSMITTANCE_THRESHOLD,
        "transmittance threshold",
    );

    ui.separator();
    ui.label("Raymarch");
    slider_u32(ui, &mut cloud.cloud_steps, cloud_ranges::CLOUD_STEPS, "cloud steps");
    slider(
        ui,
        &mut cloud.cloud_step_delta,
        cloud_ranges::CLOUD_STEP_DELTA,
        "cloud step",
    );
    slider_u32(ui, &mut cloud.light_steps, cloud_ranges::LIGHT_STEPS, "light steps");
    slider(
        ui,
        &mut cloud.light_step_delta,
        cloud_ranges::LIGHT_STEP_DELTA,
        "light step",
    );

    ui.label(format!(
        "Up to {} samples per pixel",
        cloud.max_samples_per_pixel()
    ));

    ui.separator();
    let pending = params.has_pending_cloud_changes();
    let clicked = ui
        .add_enabled(pending, egui::Button::new("Update Cloud"))
        .clicked();
    if pending {
        ui.colored_label(egui::Color32::YELLOW, "Changes not applied");
    }
    if clicked {
        params.update_cloud();
    }
    clicked
}
