use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EnrolensApp {
    pub state: AppState,
}

impl EnrolensApp {
    /// Start with one full pipeline run against the default data directory;
    /// a missing `output/` just leaves the error in the top bar.
    pub fn new() -> Self {
        let mut state = AppState::default();
        state.run_pipeline(None);
        Self { state }
    }
}

impl Default for EnrolensApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for EnrolensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: state selector ----
        egui::SidePanel::left("state_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::dashboard(ui, &self.state);
        });
    }
}
