//! egui renderer for the annotation window.

mod ai_panel;
mod dataset_panel;
mod editors;
mod episode_view;
pub mod style;
mod status_bar;
mod timeline_view;
mod windows;

use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;

use crate::egui_app::controller::EguiController;

pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(1100.0, 700.0);
const BUSY_REPAINT: Duration = Duration::from_millis(100);

pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    pub fn new(log_path: Option<PathBuf>) -> Self {
        let mut controller = EguiController::new();
        controller.ui.log_path = log_path.map(|path| path.display().to_string());
        controller.refresh_ai_status();
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_jobs();
        let dt = ctx.input(|input| input.stable_dt);
        self.controller
            .tick_playback(Duration::from_secs_f32(dt.clamp(0.0, 0.25)));

        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::SidePanel::left("dataset_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.render_dataset_panel(ui));
        egui::SidePanel::right("ai_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.render_ai_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.render_episode_view(ui));
        self.render_windows(ctx);

        if self.controller.session().playback().is_playing() {
            ctx.request_repaint();
        } else if self.controller.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}
