//! Subtask, high-level and QA list editors.
//!
//! Rows are drawn from sorted copies; edits are collected during the frame
//! and applied afterwards by storage index.

use eframe::egui::{self, DragValue, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::annotations::{
    HighLevelSegment, QaLabel, SubtaskSegment, sorted_high_levels, sorted_qa_labels,
    sorted_subtasks,
};

enum RowEdit<T> {
    Update(usize, T),
    Delete(usize),
}

fn time_field(ui: &mut Ui, value: &mut f64) -> bool {
    ui.add(
        DragValue::new(value)
            .speed(0.01)
            .range(0.0..=f64::MAX)
            .fixed_decimals(3)
            .suffix("s"),
    )
    .changed()
}

fn optional_field(ui: &mut Ui, value: &mut Option<String>, hint: &str) -> bool {
    let mut text = value.clone().unwrap_or_default();
    let changed = ui
        .add(
            egui::TextEdit::singleline(&mut text)
                .hint_text(hint)
                .desired_width(80.0),
        )
        .changed();
    if changed {
        let trimmed = text.trim();
        *value = (!trimmed.is_empty()).then(|| text.clone());
    }
    changed
}

impl EguiApp {
    pub(super) fn render_subtask_editor(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let session = self.controller.session();
        let labels = session.label_index();
        let rows: Vec<(usize, String, SubtaskSegment)> = session
            .active_annotations()
            .map(|set| {
                sorted_subtasks(&set.subtasks)
                    .into_iter()
                    .map(|row| {
                        (
                            row.storage_index,
                            labels.display_index(&row.item.label),
                            row.item.clone(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut edit = None;
        egui::ScrollArea::vertical()
            .id_salt("subtask_rows")
            .max_height(ui.available_height() - 70.0)
            .show(ui, |ui| {
                egui::Grid::new("subtask_grid").striped(true).show(ui, |ui| {
                    ui.label("#");
                    ui.label("Start");
                    ui.label("End");
                    ui.label("Label");
                    ui.end_row();
                    for (storage_index, index_label, mut segment) in rows {
                        ui.label(RichText::new(index_label).color(palette.accent_ice));
                        let mut changed = time_field(ui, &mut segment.start);
                        changed |= time_field(ui, &mut segment.end);
                        changed |= ui.text_edit_singleline(&mut segment.label).changed();
                        if ui.small_button("Delete").clicked() {
                            edit = Some(RowEdit::Delete(storage_index));
                        } else if changed {
                            edit = Some(RowEdit::Update(storage_index, segment));
                        }
                        ui.end_row();
                    }
                });
            });
        match edit {
            Some(RowEdit::Update(index, segment)) => self.controller.update_subtask(index, &segment),
            Some(RowEdit::Delete(index)) => self.controller.delete_subtask(index),
            None => {}
        }

        ui.separator();
        ui.horizontal(|ui| {
            let draft = &mut self.controller.session_mut().drafts.subtask;
            ui.add(egui::TextEdit::singleline(&mut draft.label).hint_text("label"));
            ui.add(
                egui::TextEdit::singleline(&mut draft.start)
                    .hint_text("start")
                    .desired_width(70.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut draft.end)
                    .hint_text("end")
                    .desired_width(70.0),
            );
            if ui.button("Start = now").clicked() {
                self.controller.session_mut().stamp_subtask_time(false);
            }
            if ui.button("End = now").clicked() {
                self.controller.session_mut().stamp_subtask_time(true);
            }
            if ui.button("Add").clicked() {
                self.controller.add_subtask();
            }
        });
    }

    pub(super) fn render_high_level_editor(&mut self, ui: &mut Ui) {
        let rows: Vec<(usize, HighLevelSegment)> = self
            .controller
            .session()
            .active_annotations()
            .map(|set| {
                sorted_high_levels(&set.high_levels)
                    .into_iter()
                    .map(|row| (row.storage_index, row.item.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut edit = None;
        egui::ScrollArea::vertical()
            .id_salt("high_level_rows")
            .max_height(ui.available_height() - 100.0)
            .show(ui, |ui| {
                egui::Grid::new("high_level_grid").striped(true).show(ui, |ui| {
                    for header in ["Start", "End", "User prompt", "Robot utterance", "Skill", "Scenario", "Response"] {
                        ui.label(header);
                    }
                    ui.end_row();
                    for (storage_index, mut segment) in rows {
                        let mut changed = time_field(ui, &mut segment.start);
                        changed |= time_field(ui, &mut segment.end);
                        changed |= ui.text_edit_singleline(&mut segment.user_prompt).changed();
                        changed |= ui.text_edit_singleline(&mut segment.robot_utterance).changed();
                        changed |= optional_field(ui, &mut segment.skill, "skill");
                        changed |= optional_field(ui, &mut segment.scenario_type, "scenario");
                        changed |= optional_field(ui, &mut segment.response_type, "response");
                        if ui.small_button("Delete").clicked() {
                            edit = Some(RowEdit::Delete(storage_index));
                        } else if changed {
                            edit = Some(RowEdit::Update(storage_index, segment));
                        }
                        ui.end_row();
                    }
                });
            });
        match edit {
            Some(RowEdit::Update(index, segment)) => self.controller.update_high_level(index, segment),
            Some(RowEdit::Delete(index)) => self.controller.delete_high_level(index),
            None => {}
        }

        ui.separator();
        let draft = &mut self.controller.session_mut().drafts.high_level;
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut draft.start).hint_text("start").desired_width(70.0));
            ui.add(egui::TextEdit::singleline(&mut draft.end).hint_text("end").desired_width(70.0));
            ui.add(egui::TextEdit::singleline(&mut draft.user_prompt).hint_text("user prompt"));
            ui.add(egui::TextEdit::singleline(&mut draft.robot_utterance).hint_text("robot utterance"));
        });
        ui.horizontal(|ui| {
            let draft = &mut self.controller.session_mut().drafts.high_level;
            ui.add(egui::TextEdit::singleline(&mut draft.skill).hint_text("skill").desired_width(90.0));
            ui.add(egui::TextEdit::singleline(&mut draft.scenario_type).hint_text("scenario").desired_width(90.0));
            ui.add(egui::TextEdit::singleline(&mut draft.response_type).hint_text("response").desired_width(90.0));
            if ui.button("Start = now").clicked() {
                self.controller.session_mut().stamp_high_level_time(false);
            }
            if ui.button("End = now").clicked() {
                self.controller.session_mut().stamp_high_level_time(true);
            }
            if ui.button("Add").clicked() {
                self.controller.add_high_level();
            }
        });
    }

    pub(super) fn render_qa_editor(&mut self, ui: &mut Ui) {
        let rows: Vec<(usize, QaLabel)> = self
            .controller
            .session()
            .active_annotations()
            .map(|set| {
                sorted_qa_labels(&set.qa_labels)
                    .into_iter()
                    .map(|row| (row.storage_index, row.item.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut edit = None;
        egui::ScrollArea::vertical()
            .id_salt("qa_rows")
            .max_height(ui.available_height() - 70.0)
            .show(ui, |ui| {
                egui::Grid::new("qa_grid").striped(true).show(ui, |ui| {
                    for header in ["Frame", "Type", "Question", "Answer"] {
                        ui.label(header);
                    }
                    ui.end_row();
                    for (storage_index, mut label) in rows {
                        let mut changed = ui.add(DragValue::new(&mut label.frame_idx)).changed();
                        changed |= ui
                            .add(egui::TextEdit::singleline(&mut label.kind).desired_width(80.0))
                            .changed();
                        changed |= ui.text_edit_singleline(&mut label.question).changed();
                        changed |= ui.text_edit_singleline(&mut label.answer).changed();
                        if ui.small_button("Delete").clicked() {
                            edit = Some(RowEdit::Delete(storage_index));
                        } else if changed {
                            edit = Some(RowEdit::Update(storage_index, label));
                        }
                        ui.end_row();
                    }
                });
            });
        match edit {
            Some(RowEdit::Update(index, label)) => self.controller.update_qa_label(index, label),
            Some(RowEdit::Delete(index)) => self.controller.delete_qa_label(index),
            None => {}
        }

        ui.separator();
        ui.horizontal(|ui| {
            let draft = &mut self.controller.session_mut().drafts.qa;
            ui.add(egui::TextEdit::singleline(&mut draft.frame_idx).hint_text("frame").desired_width(60.0));
            ui.add(egui::TextEdit::singleline(&mut draft.kind).hint_text("type").desired_width(80.0));
            ui.add(egui::TextEdit::singleline(&mut draft.question).hint_text("question"));
            ui.add(egui::TextEdit::singleline(&mut draft.answer).hint_text("answer"));
            if ui.button("Frame = now").clicked() {
                self.controller.session_mut().stamp_qa_frame();
            }
            if ui.button("Add").clicked() {
                self.controller.add_qa_label();
            }
        });
    }
}
