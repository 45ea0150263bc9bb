use eframe::egui::{self, DragValue, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::api::GenerationMode;
use crate::batch::BatchState;
use crate::generation::{GenerationKind, SubtaskParams, VqaParams};

fn subtask_params(ui: &mut Ui, params: &mut SubtaskParams) {
    egui::Grid::new("subtask_params").num_columns(2).show(ui, |ui| {
        ui.label("Stride (s)");
        ui.add(DragValue::new(&mut params.stride_s).speed(0.1).range(0.1..=600.0));
        ui.end_row();
        ui.label("Summary frames");
        ui.add(DragValue::new(&mut params.summary_frames).range(1..=64));
        ui.end_row();
        ui.label("Segment frames");
        ui.add(DragValue::new(&mut params.segment_frames).range(1..=64));
        ui.end_row();
        ui.label("Max steps");
        ui.add(DragValue::new(&mut params.max_steps).range(1..=10_000));
        ui.end_row();
        ui.label("Language");
        ui.text_edit_singleline(&mut params.language);
        ui.end_row();
        ui.label("Merge adjacent");
        ui.checkbox(&mut params.merge_adjacent, "");
        ui.end_row();
    });
}

fn vqa_params(ui: &mut Ui, params: &mut VqaParams) {
    egui::Grid::new("vqa_params").num_columns(2).show(ui, |ui| {
        ui.label("Stride (s)");
        ui.add(DragValue::new(&mut params.stride_s).speed(0.1).range(0.1..=600.0));
        ui.end_row();
        ui.label("Window (s)");
        ui.add(DragValue::new(&mut params.window_s).speed(0.1).range(0.1..=600.0));
        ui.end_row();
        ui.label("Window frames");
        ui.add(DragValue::new(&mut params.window_frames).range(1..=64));
        ui.end_row();
        ui.label("Language");
        ui.text_edit_singleline(&mut params.language);
        ui.end_row();
        ui.label("Scenario type");
        ui.text_edit_singleline(&mut params.scenario_type);
        ui.end_row();
        ui.label("Response type");
        ui.text_edit_singleline(&mut params.response_type);
        ui.end_row();
        ui.label("Skill");
        ui.text_edit_singleline(&mut params.skill);
        ui.end_row();
    });
}

impl EguiApp {
    pub(super) fn render_ai_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("AI generation");
        ui.horizontal(|ui| {
            let kind = &mut self.controller.ui.ai.kind;
            ui.selectable_value(kind, GenerationKind::Subtasks, "Subtasks");
            ui.selectable_value(kind, GenerationKind::FakeVqa, "Fake VQA");
        });
        let kind = self.controller.ui.ai.kind;
        let params = &mut self.controller.session_mut().params;
        match kind {
            GenerationKind::Subtasks => subtask_params(ui, &mut params.subtasks),
            GenerationKind::FakeVqa => vqa_params(ui, &mut params.fake_vqa),
        }
        ui.horizontal(|ui| {
            if ui.button("Save settings").clicked() {
                self.controller.save_generation_params();
            }
            if ui.button("AI config...").clicked() {
                self.controller.ui.ai.settings_open = true;
                self.controller.load_ai_settings();
            }
        });

        ui.separator();
        ui.label(RichText::new("Active episode").strong());
        ui.horizontal(|ui| {
            let ai = &mut self.controller.ui.ai;
            ui.selectable_value(&mut ai.mode, GenerationMode::Replace, "Replace");
            ui.selectable_value(&mut ai.mode, GenerationMode::Append, "Append");
            ui.checkbox(&mut ai.resume_from_last, "Resume from last");
        });
        ui.horizontal(|ui| {
            ui.label("Start at");
            ui.add(
                egui::TextEdit::singleline(&mut self.controller.ui.ai.start_time)
                    .hint_text("seconds")
                    .desired_width(70.0),
            );
            if ui.button("Now").clicked() {
                self.controller.stamp_generation_start();
            }
            if ui.button("Generate").clicked() {
                self.controller.generate_active();
            }
        });

        ui.separator();
        ui.label(RichText::new("Batch").strong());
        ui.horizontal(|ui| {
            ui.label("Episodes");
            ui.add(
                egui::TextEdit::singleline(&mut self.controller.ui.ai.batch_selection)
                    .hint_text("all, or e.g. 0-3, 7"),
            );
        });
        let state = self.controller.session().batch().state();
        ui.horizontal(|ui| match state {
            BatchState::Idle => {
                if ui.button("Start batch").clicked() {
                    self.controller.start_batch();
                }
            }
            BatchState::Running(running) => {
                ui.label(format!("Running {}", running.label()));
                if ui.button("Cancel").clicked() {
                    self.controller.cancel_batch();
                }
            }
            BatchState::Canceling(_) => {
                ui.label(RichText::new("Canceling...").color(palette.warning));
            }
        });
        egui::ScrollArea::vertical()
            .id_salt("batch_log")
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for line in &self.controller.ui.ai.batch_log {
                    ui.label(RichText::new(line).monospace().color(palette.text_muted));
                }
            });
    }
}
