use eframe::egui::{self, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::egui_app::state::EditorTab;

/// Stamps read this clock; the browser video is not synced to it.
const CLOCK_NOTE: &str =
    "Now buttons use this position, not the browser video. Type the video time here to match.";

impl EguiApp {
    pub(super) fn render_episode_view(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let Some(episode) = self.controller.session().active_episode() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Select an episode").color(palette.text_muted));
            });
            return;
        };
        ui.horizontal(|ui| {
            ui.heading(format!("Episode {episode}"));
            if let Some(locked) = self.controller.session().batch().in_flight() {
                if locked == episode {
                    ui.label(RichText::new("regenerating...").color(palette.warning));
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset").on_hover_text("Discard local edits").clicked() {
                    self.controller.reset_active();
                }
                if ui.button("Save").clicked() {
                    self.controller.save_active();
                }
            });
        });
        self.render_playback_bar(ui);
        ui.add_space(4.0);
        self.render_timeline(ui);
        ui.separator();
        ui.horizontal(|ui| {
            let tab = &mut self.controller.ui.editor_tab;
            ui.selectable_value(tab, EditorTab::Subtasks, "Subtasks");
            ui.selectable_value(tab, EditorTab::HighLevel, "High-level");
            ui.selectable_value(tab, EditorTab::Qa, "QA");
        });
        ui.separator();
        match self.controller.ui.editor_tab {
            EditorTab::Subtasks => self.render_subtask_editor(ui),
            EditorTab::HighLevel => self.render_high_level_editor(ui),
            EditorTab::Qa => self.render_qa_editor(ui),
        }
    }

    fn render_playback_bar(&mut self, ui: &mut Ui) {
        let session = self.controller.session();
        let playing = session.playback().is_playing();
        let duration = session.playback().duration();
        let mut position = session.playback().position();
        let frame = session.current_frame();
        ui.horizontal(|ui| {
            if ui.button(if playing { "Pause" } else { "Play" }).clicked() {
                self.controller.session_mut().playback_mut().toggle();
            }
            let mut seek_to = None;
            match duration {
                Some(duration) => {
                    let slider = egui::Slider::new(&mut position, 0.0..=duration)
                        .show_value(false)
                        .trailing_fill(true);
                    if ui.add(slider).changed() {
                        seek_to = Some(position);
                    }
                    let entry = egui::DragValue::new(&mut position)
                        .range(0.0..=duration)
                        .speed(0.01)
                        .max_decimals(3)
                        .suffix(" s");
                    if ui.add(entry).on_hover_text(CLOCK_NOTE).changed() {
                        seek_to = Some(position);
                    }
                    ui.monospace(format!("/ {duration:.3}s  frame {frame}"));
                }
                None => {
                    let entry = egui::DragValue::new(&mut position)
                        .range(0.0..=f64::MAX)
                        .speed(0.01)
                        .max_decimals(3)
                        .suffix(" s");
                    if ui.add(entry).on_hover_text(CLOCK_NOTE).changed() {
                        seek_to = Some(position);
                    }
                    ui.label("Duration unknown");
                }
            }
            if let Some(seconds) = seek_to {
                self.controller.session_mut().playback_mut().seek(seconds);
            }
            if ui.button("Open video").clicked() {
                self.controller.open_video();
            }
        });
        ui.label(RichText::new(CLOCK_NOTE).small().weak());
    }
}
