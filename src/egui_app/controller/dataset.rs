//! Dataset-level actions: connecting, loading, exporting and importing.

use std::sync::Arc;

use rfd::FileDialog;
use tracing::info;

use super::{EguiController, FetchPurpose, JobMessage};
use crate::annotations::EpisodeIndex;
use crate::api::{
    DatasetSummary, ExportRequest, ExportResult, HttpBackend, ImportKind, ImportResult,
    PushToHubRequest, PushToHubResult,
};
use crate::egui_app::state::StatusTone;

impl EguiController {
    /// Point the session at the server URL typed in the dataset form.
    pub fn apply_server_url(&mut self) -> bool {
        let url = self.ui.dataset_form.server_url.trim().to_string();
        if url == self.settings.server.base_url {
            return true;
        }
        let backend = match HttpBackend::new(&url, self.settings.server.http_settings()) {
            Ok(backend) => backend,
            Err(err) => {
                self.report("Connecting", err);
                return false;
            }
        };
        if let Err(err) = self.session.set_backend(Arc::new(backend)) {
            self.report_session("Connecting", err);
            return false;
        }
        self.jobs.epoch += 1;
        self.jobs.pending_select = None;
        self.settings.server.base_url = url;
        self.persist_settings();
        self.refresh_ai_status();
        true
    }

    pub fn load_dataset(&mut self) {
        if !self.session.batch().is_idle() {
            self.set_status("Wait for the batch run to finish first", StatusTone::Warning);
            return;
        }
        if !self.apply_server_url() {
            return;
        }
        self.settings.dataset = self.ui.dataset_form.to_settings();
        self.persist_settings();
        let request = self.settings.dataset.load_request();
        let backend = self.session.backend();
        self.set_status("Loading dataset...", StatusTone::Busy);
        self.jobs
            .spawn(move || JobMessage::DatasetLoaded(backend.load_dataset(&request)));
    }

    pub(super) fn on_dataset_loaded(&mut self, summary: DatasetSummary) {
        self.jobs.epoch += 1;
        self.jobs.pending_select = None;
        let result = self.session.apply_dataset(summary).map(|dataset| {
            (
                dataset.display_name().to_string(),
                dataset.episodes.len(),
                dataset.episodes.first().map(|episode| episode.episode_index),
            )
        });
        match result {
            Ok((name, count, first)) => {
                if let Some(key) = self.session.video_key() {
                    self.ui.dataset_form.video_key = key.to_string();
                }
                self.set_status(format!("Loaded {name}: {count} episodes"), StatusTone::Info);
                if let Some(first) = first {
                    self.select_episode(first);
                }
                if self.ui.dataset_form.prefetch {
                    self.start_prefetch();
                }
            }
            Err(err) => self.report_session("Loading dataset", err),
        }
    }

    /// Fetch every episode not known locally, one request at a time.
    fn start_prefetch(&mut self) {
        let targets = self.session.prefetch_targets();
        self.spawn_sequential_fetch(targets, FetchPurpose::Prefetch);
    }

    fn spawn_sequential_fetch(&mut self, targets: Vec<EpisodeIndex>, purpose: FetchPurpose) {
        if targets.is_empty() {
            return;
        }
        let backend = self.session.backend();
        let tx = self.jobs.sender();
        let epoch = self.jobs.epoch;
        info!(episodes = targets.len(), ?purpose, "fetching annotations in background");
        std::thread::spawn(move || {
            for episode in targets {
                let result = backend.fetch_annotations(episode);
                let message = JobMessage::EpisodeFetched {
                    epoch,
                    episode,
                    purpose,
                    result,
                };
                if tx.send(message).is_err() {
                    break;
                }
            }
        });
    }

    pub fn browse_local_path(&mut self) {
        if let Some(path) = FileDialog::new().pick_folder() {
            self.ui.dataset_form.local_path = path.display().to_string();
        }
    }

    pub fn browse_export_dir(&mut self) {
        if let Some(path) = FileDialog::new().pick_folder() {
            self.ui.export.output_dir = path.display().to_string();
        }
    }

    pub fn browse_import_root(&mut self) {
        if let Some(path) = FileDialog::new().pick_folder() {
            self.ui.import.root_path = path.display().to_string();
        }
    }

    pub fn export(&mut self) {
        if self.session.dataset().is_none() {
            self.set_status("Load a dataset before exporting", StatusTone::Warning);
            return;
        }
        let output_dir = self.ui.export.output_dir.trim();
        let request = ExportRequest {
            output_dir: (!output_dir.is_empty()).then(|| output_dir.to_string()),
            copy_videos: self.ui.export.copy_videos,
        };
        let backend = self.session.backend();
        self.set_status("Exporting...", StatusTone::Busy);
        self.jobs
            .spawn(move || JobMessage::Exported(backend.export(&request)));
    }

    pub(super) fn on_exported(&mut self, result: ExportResult) {
        let mut text = format!(
            "Exported to {}: {} subtasks, {} high-level tasks",
            result.output_dir, result.subtasks, result.tasks_high_level
        );
        if let Some(qa) = result.qa_labels {
            text.push_str(&format!(", {qa} QA labels"));
        }
        self.ui.export.open = false;
        self.set_status(text, StatusTone::Info);
    }

    pub fn push_to_hub(&mut self) {
        if self.session.dataset().is_none() {
            self.set_status("Load a dataset before pushing", StatusTone::Warning);
            return;
        }
        let form = &self.ui.push;
        let token = form.hf_token.trim();
        if token.is_empty() {
            self.set_status("A Hugging Face token is required", StatusTone::Warning);
            return;
        }
        let new_repo_id = form.new_repo_id.trim();
        if !form.push_in_place && new_repo_id.is_empty() {
            self.set_status("Enter a repository id to push to", StatusTone::Warning);
            return;
        }
        let request = PushToHubRequest {
            hf_token: token.to_string(),
            push_in_place: form.push_in_place,
            new_repo_id: (!form.push_in_place).then(|| new_repo_id.to_string()),
            private: form.private,
            commit_message: form.commit_message.trim().to_string(),
        };
        let backend = self.session.backend();
        self.set_status("Pushing to hub...", StatusTone::Busy);
        self.jobs
            .spawn(move || JobMessage::Pushed(backend.push_to_hub(&request)));
    }

    pub(super) fn on_pushed(&mut self, result: PushToHubResult) {
        self.ui.push.open = false;
        self.ui.push.hf_token.clear();
        let text = match result.url {
            Some(url) if !result.message.is_empty() => format!("{} ({url})", result.message),
            Some(url) => format!("Pushed to {url}"),
            None if result.message.is_empty() => "Pushed to hub".to_string(),
            None => result.message,
        };
        self.set_status(text, StatusTone::Info);
    }

    pub fn import_from_root(&mut self) {
        if self.session.dataset().is_none() {
            self.set_status("Load a dataset before importing", StatusTone::Warning);
            return;
        }
        if !self.session.batch().is_idle() {
            self.set_status("Wait for the batch run to finish first", StatusTone::Warning);
            return;
        }
        let root = self.ui.import.root_path.trim().to_string();
        if root.is_empty() {
            self.set_status("Choose a folder to import from", StatusTone::Warning);
            return;
        }
        let kind = self.ui.import.kind;
        let backend = self.session.backend();
        self.set_status(format!("Importing {}...", kind.label()), StatusTone::Busy);
        self.jobs.spawn(move || JobMessage::Imported {
            kind,
            result: backend.import_from_root(kind, &root),
        });
    }

    pub(super) fn on_imported(&mut self, kind: ImportKind, result: ImportResult) {
        self.ui.import.open = false;
        let mut text = format!(
            "Imported {} {} into {} episodes",
            result.imported_items(),
            kind.label(),
            result.episodes_updated
        );
        if result.missing_samples > 0 {
            text.push_str(&format!(" ({} samples missing)", result.missing_samples));
        }
        self.set_status(text, StatusTone::Info);
        let known = self.session.known_episodes();
        self.spawn_sequential_fetch(known, FetchPurpose::Refresh);
        if self.ui.dataset_form.prefetch {
            self.start_prefetch();
        }
    }
}
