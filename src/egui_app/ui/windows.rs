use eframe::egui::{self, RichText};

use super::EguiApp;
use super::style;
use crate::api::ImportKind;

impl EguiApp {
    pub(super) fn render_windows(&mut self, ctx: &egui::Context) {
        self.render_alert(ctx);
        self.render_export_window(ctx);
        self.render_push_window(ctx);
        self.render_import_window(ctx);
        self.render_ai_settings_window(ctx);
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.controller.ui.alert.clone() else {
            return;
        };
        egui::Modal::new(egui::Id::new("alert")).show(ctx, |ui| {
            ui.heading(&alert.title);
            ui.label(&alert.message);
            if ui.button("OK").clicked() {
                self.controller.dismiss_alert();
            }
        });
    }

    fn render_export_window(&mut self, ctx: &egui::Context) {
        let mut open = self.controller.ui.export.open;
        let preview = self.controller.session().export_preview();
        egui::Window::new("Export").open(&mut open).show(ctx, |ui| {
            ui.label(
                RichText::new(format!(
                    "Loaded locally: {} subtask labels, {} high-level tasks, {} QA labels across {} episodes",
                    preview.subtasks, preview.tasks_high_level, preview.qa_labels, preview.episodes
                ))
                .color(style::palette().text_muted),
            );
            ui.horizontal(|ui| {
                ui.label("Output folder");
                ui.add(
                    egui::TextEdit::singleline(&mut self.controller.ui.export.output_dir)
                        .hint_text("server default"),
                );
                if ui.button("Browse...").clicked() {
                    self.controller.browse_export_dir();
                }
            });
            ui.checkbox(&mut self.controller.ui.export.copy_videos, "Copy videos");
            if ui.button("Export").clicked() {
                self.controller.export();
            }
        });
        self.controller.ui.export.open &= open;
    }

    fn render_push_window(&mut self, ctx: &egui::Context) {
        let mut open = self.controller.ui.push.open;
        egui::Window::new("Push to hub").open(&mut open).show(ctx, |ui| {
            let form = &mut self.controller.ui.push;
            egui::Grid::new("push_form").num_columns(2).show(ui, |ui| {
                ui.label("Token");
                ui.add(egui::TextEdit::singleline(&mut form.hf_token).password(true));
                ui.end_row();
                ui.label("Push in place");
                ui.checkbox(&mut form.push_in_place, "");
                ui.end_row();
                if !form.push_in_place {
                    ui.label("New repo id");
                    ui.text_edit_singleline(&mut form.new_repo_id);
                    ui.end_row();
                }
                ui.label("Private");
                ui.checkbox(&mut form.private, "");
                ui.end_row();
                ui.label("Commit message");
                ui.text_edit_singleline(&mut form.commit_message);
                ui.end_row();
            });
            if ui.button("Push").clicked() {
                self.controller.push_to_hub();
            }
        });
        self.controller.ui.push.open &= open;
    }

    fn render_import_window(&mut self, ctx: &egui::Context) {
        let mut open = self.controller.ui.import.open;
        egui::Window::new("Import").open(&mut open).show(ctx, |ui| {
            ui.horizontal(|ui| {
                let kind = &mut self.controller.ui.import.kind;
                for option in [ImportKind::Subtasks, ImportKind::QaLabels] {
                    ui.selectable_value(kind, option, option.label());
                }
            });
            ui.horizontal(|ui| {
                ui.label("Root folder");
                ui.text_edit_singleline(&mut self.controller.ui.import.root_path);
                if ui.button("Browse...").clicked() {
                    self.controller.browse_import_root();
                }
            });
            if ui.button("Import").clicked() {
                self.controller.import_from_root();
            }
        });
        self.controller.ui.import.open &= open;
    }

    fn render_ai_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.controller.ui.ai.settings_open;
        egui::Window::new("AI settings")
            .open(&mut open)
            .default_width(520.0)
            .show(ctx, |ui| {
                let ai = &mut self.controller.ui.ai;
                ui.label("Config (JSON)");
                ui.add(
                    egui::TextEdit::multiline(&mut ai.config_text)
                        .code_editor()
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );
                ui.label("Subtask prompt");
                ui.add(
                    egui::TextEdit::multiline(&mut ai.subtask_prompt)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
                ui.label("VQA prompt");
                ui.add(
                    egui::TextEdit::multiline(&mut ai.vqa_prompt)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
                ui.horizontal(|ui| {
                    if ui.button("Reload").clicked() {
                        self.controller.load_ai_settings();
                    }
                    if ui.button("Save").clicked() {
                        self.controller.save_ai_settings();
                    }
                });
            });
        self.controller.ui.ai.settings_open &= open;
    }
}
