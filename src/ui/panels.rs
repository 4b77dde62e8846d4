use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – state selector
// ---------------------------------------------------------------------------

/// Render the state selector panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Select State");
    ui.separator();

    if state.states.is_empty() {
        ui.label("No data loaded.");
        return;
    }

    let current = state.selected_state.clone().unwrap_or_default();
    let mut picked: Option<String> = None;

    egui::ComboBox::from_id_salt("state_selector")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &state.states {
                if ui.selectable_label(current == *name, name).clicked() && current != *name {
                    picked = Some(name.clone());
                }
            }
        });

    // Selection change re-runs the whole load → filter → aggregate cycle.
    if let Some(name) = picked {
        state.select_state(name);
    }

    ui.add_space(8.0);
    if let Some(ds) = &state.datasets {
        ui.label(format!("{} states", state.states.len()));
        ui.label(format!("{} district-month rows", ds.district_month.len()));
        ui.label(format!("{} districts profiled", ds.intelligence.len()));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_data_dir_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(state.data_dir.display().to_string());

        if state.datasets.is_some() {
            ui.separator();
            if let Some(selected) = &state.selected_state {
                ui.label(format!("Showing: {selected}"));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_data_dir_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open analytics output folder")
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("switching data directory to {}", dir.display());
        state.set_data_dir(dir);
    }
}
