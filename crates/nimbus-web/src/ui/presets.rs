/// Button pressed in the Presets folder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PresetAction {
    #[default]
    None,
    Export,
    Import,
    Reset,
}

/// Outcome of the last preset operation, shown under the buttons.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum PresetStatus {
    #[default]
    None,
    Exported,
    Imported,
    Reset,
    Error(String),
}

pub fn show(ui: &mut egui::Ui, status: &PresetStatus) -> PresetAction {
    let mut action = PresetAction::None;

    ui.horizontal(|ui| {
        if ui.button("Export").clicked() {
            action = PresetAction::Export;
        }
        if ui.button("Import").clicked() {
            action = PresetAction::Import;
        }
        if ui.button("Reset").clicked() {
            action = PresetAction::Reset;
        }
    });

    match status {
        PresetStatus::None => {}
        PresetStatus::Exported => {
            ui.colored_label(egui::Color32::GREEN, "Exported");
        }
        PresetStatus::Imported => {
            ui.colored_label(egui::Color32::GREEN, "Imported");
        }
        PresetStatus::Reset => {
            ui.label("Defaults restored");
        }
        PresetStatus::Error(msg) => {
            ui.colored_label(egui::Color32::RED, format!("Error: {msg}"));
        }
    }

    action
}
