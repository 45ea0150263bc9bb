use eframe::egui::{self, RichText, Ui};

use super::EguiApp;
use super::style;
use crate::api::DatasetSource;

impl EguiApp {
    pub(super) fn render_dataset_panel(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.heading("Dataset");
        let form = &mut self.controller.ui.dataset_form;
        egui::Grid::new("dataset_form")
            .num_columns(2)
            .spacing([6.0, 4.0])
            .show(ui, |ui| {
                ui.label("Server");
                ui.text_edit_singleline(&mut form.server_url);
                ui.end_row();
                ui.label("Source");
                egui::ComboBox::from_id_salt("dataset_source")
                    .selected_text(form.source.label())
                    .show_ui(ui, |ui| {
                        for source in [DatasetSource::Hub, DatasetSource::Local] {
                            ui.selectable_value(&mut form.source, source, source.label());
                        }
                    });
                ui.end_row();
                match form.source {
                    DatasetSource::Hub => {
                        ui.label("Repo id");
                        ui.text_edit_singleline(&mut form.repo_id);
                        ui.end_row();
                        ui.label("Revision");
                        ui.text_edit_singleline(&mut form.revision);
                        ui.end_row();
                    }
                    DatasetSource::Local => {
                        ui.label("Folder");
                        ui.text_edit_singleline(&mut form.local_path);
                        ui.end_row();
                    }
                }
                ui.label("Video key");
                ui.text_edit_singleline(&mut form.video_key);
                ui.end_row();
            });
        ui.checkbox(
            &mut self.controller.ui.dataset_form.prefetch,
            "Fetch all annotations after loading",
        );
        ui.horizontal(|ui| {
            if self.controller.ui.dataset_form.source == DatasetSource::Local
                && ui.button("Browse...").clicked()
            {
                self.controller.browse_local_path();
            }
            if ui.button("Load").clicked() {
                self.controller.load_dataset();
            }
        });
        ui.separator();

        let Some(dataset) = self.controller.session().dataset() else {
            ui.label(RichText::new("No dataset loaded").color(palette.text_muted));
            return;
        };
        ui.label(RichText::new(dataset.display_name()).strong());
        let fps = dataset
            .fps
            .map(|fps| format!("{fps:.1} fps"))
            .unwrap_or_else(|| "fps unknown".into());
        ui.label(
            RichText::new(format!("{} episodes, {fps}", dataset.episodes.len()))
                .color(palette.text_muted),
        );
        if !dataset.video_keys.is_empty() {
            let keys = dataset.video_keys.clone();
            let mut current = self.controller.session().video_key().map(str::to_string);
            let before = current.clone();
            egui::ComboBox::from_id_salt("video_key")
                .selected_text(current.clone().unwrap_or_else(|| "default".into()))
                .show_ui(ui, |ui| {
                    for key in keys {
                        let label = key.clone();
                        ui.selectable_value(&mut current, Some(key), label);
                    }
                });
            if current != before {
                self.controller.session_mut().set_video_key(current);
            }
        }
        ui.separator();
        self.render_episode_list(ui);
    }

    fn render_episode_list(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let session = self.controller.session();
        let active = session.active_episode();
        let locked = session.batch().in_flight();
        let rows: Vec<(u32, String, bool)> = session
            .dataset()
            .map(|dataset| {
                dataset
                    .episodes
                    .iter()
                    .map(|episode| {
                        let index = episode.episode_index;
                        let annotated = session
                            .corpus()
                            .episode(index)
                            .is_some_and(|set| !set.is_empty());
                        let duration = episode
                            .playable_duration()
                            .map(|d| format!("{d:.1}s"))
                            .unwrap_or_else(|| "?".into());
                        (
                            index,
                            format!("Episode {index}  ({duration}, {} frames)", episode.length),
                            annotated,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("episode_list")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, text, annotated) in rows {
                    let mut label = RichText::new(text);
                    if locked == Some(index) {
                        label = label.color(palette.warning);
                    } else if annotated {
                        label = label.color(palette.accent_ice);
                    }
                    if ui.selectable_label(active == Some(index), label).clicked() {
                        clicked = Some(index);
                    }
                }
            });
        if let Some(index) = clicked {
            self.controller.select_episode(index);
        }
    }
}
