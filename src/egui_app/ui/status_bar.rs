use eframe::egui::{self, Frame, Margin, RichText, StrokeKind};

use super::EguiApp;
use super::style;

impl EguiApp {
    pub(super) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("robolabel").strong());
                    ui.separator();
                    ui.label(
                        RichText::new(&self.controller.settings().server.base_url)
                            .color(palette.text_muted),
                    );
                    ui.separator();
                    let (text, color) = match &self.controller.ui.ai.status {
                        Some(status) if status.enabled => {
                            (format!("AI: {}", status.model), palette.playhead)
                        }
                        Some(_) => ("AI: disabled".to_string(), palette.text_muted),
                        None => ("AI: unavailable".to_string(), palette.warning),
                    };
                    ui.label(RichText::new(text).color(color));
                    if ui.small_button("Refresh").clicked() {
                        self.controller.refresh_ai_status();
                    }
                    let has_dataset = self.controller.session().dataset().is_some();
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(has_dataset, |ui| {
                            if ui.button("Import...").clicked() {
                                self.controller.ui.import.open = true;
                            }
                            if ui.button("Push to hub...").clicked() {
                                self.controller.ui.push.open = true;
                            }
                            if ui.button("Export...").clicked() {
                                self.controller.ui.export.open = true;
                            }
                        });
                    });
                });
            });
    }

    pub(super) fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::new()
                    .fill(palette.bg_primary)
                    .stroke(style::section_stroke())
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                let (badge, color) = status.tone.badge();
                ui.horizontal(|ui| {
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 0.0, color);
                    ui.painter()
                        .rect_stroke(badge_rect, 0.0, style::inner_border(), StrokeKind::Inside);
                    ui.label(badge);
                    ui.separator();
                    let response = ui.label(&status.text);
                    if !status.log.is_empty() {
                        response.on_hover_text(status.log.join("\n"));
                    }
                    if let Some(path) = &self.controller.ui.log_path {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(path).small().color(palette.text_muted));
                        });
                    }
                });
            });
    }
}
