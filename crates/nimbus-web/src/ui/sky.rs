use nimbus_core::settings::sky_ranges;
use nimbus_core::SceneParams;

use super::slider;

/// Sky folder. Every change applies immediately. Returns whether anything changed.
pub fn show(ui: &mut egui::Ui, params: &mut SceneParams) -> bool {
    let sky = &mut params.sky;
    let mut changed = false;

    changed |= slider(ui, &mut sky.turbidity, sky_ranges::TURBIDITY, "turbidity");
    changed |= slider(ui, &mut sky.rayleigh, sky_ranges::RAYLEIGH, "rayleigh");
    changed |= slider(
        ui,
        &mut sky.mie_coefficient,
        sky_ranges::MIE_COEFFICIENT,
        "mie coefficient",
    );
    changed |= slider(
        ui,
        &mut sky.mie_directional_g,
        sky_ranges::MIE_DIRECTIONAL_G,
        "mie directional g",
    );
    changed |= slider(ui, &mut sky.exposure, sky_ranges::EXPOSURE, "exposure");

    if changed {
        params.sky_changed();
    }
    changed
}
