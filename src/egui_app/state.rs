//! Plain UI state mirrored by the egui renderer.
//!
//! Nothing here talks to the server; the controller fills these structs and
//! the views read and edit them.

use egui::Color32;

use crate::api::{AiStatus, DatasetSource, GenerationMode, ImportKind};
use crate::batch::BatchEvent;
use crate::config::DatasetSettings;
use crate::generation::GenerationKind;

const STATUS_LOG_LIMIT: usize = 200;
const BATCH_LOG_LIMIT: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

impl StatusTone {
    pub fn badge(self) -> (&'static str, Color32) {
        match self {
            Self::Idle => ("Idle", Color32::from_rgb(42, 42, 42)),
            Self::Busy => ("Working", Color32::from_rgb(31, 139, 255)),
            Self::Info => ("Info", Color32::from_rgb(64, 140, 112)),
            Self::Warning => ("Warning", Color32::from_rgb(192, 138, 43)),
            Self::Error => ("Error", Color32::from_rgb(192, 57, 43)),
        }
    }
}

/// Footer status line plus a rolling history.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
    pub log: Vec<String>,
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self {
            text: "Load a dataset to get started".into(),
            tone: StatusTone::Idle,
            log: Vec::new(),
        }
    }
}

impl StatusBarState {
    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.text = text.into();
        self.tone = tone;
        push_bounded(&mut self.log, self.text.clone(), STATUS_LOG_LIMIT);
    }
}

/// Dataset load form, seeded from the saved settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetFormState {
    pub server_url: String,
    pub source: DatasetSource,
    pub repo_id: String,
    pub revision: String,
    pub local_path: String,
    pub video_key: String,
    pub prefetch: bool,
}

impl DatasetFormState {
    pub fn from_settings(server_url: &str, dataset: &DatasetSettings) -> Self {
        Self {
            server_url: server_url.to_string(),
            source: dataset.source,
            repo_id: dataset.repo_id.clone(),
            revision: dataset.revision.clone(),
            local_path: dataset.local_path.clone(),
            video_key: dataset.video_key.clone(),
            prefetch: dataset.prefetch_annotations,
        }
    }

    pub fn to_settings(&self) -> DatasetSettings {
        DatasetSettings {
            source: self.source,
            repo_id: self.repo_id.clone(),
            revision: self.revision.clone(),
            local_path: self.local_path.clone(),
            video_key: self.video_key.clone(),
            prefetch_annotations: self.prefetch,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorTab {
    #[default]
    Subtasks,
    HighLevel,
    Qa,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportFormState {
    pub open: bool,
    pub output_dir: String,
    pub copy_videos: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PushFormState {
    pub open: bool,
    pub hf_token: String,
    pub push_in_place: bool,
    pub new_repo_id: String,
    pub private: bool,
    pub commit_message: String,
}

impl Default for PushFormState {
    fn default() -> Self {
        Self {
            open: false,
            hf_token: String::new(),
            push_in_place: true,
            new_repo_id: String::new(),
            private: false,
            commit_message: "Update annotations".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportFormState {
    pub open: bool,
    pub kind: ImportKind,
    pub root_path: String,
}

impl Default for ImportFormState {
    fn default() -> Self {
        Self {
            open: false,
            kind: ImportKind::Subtasks,
            root_path: String::new(),
        }
    }
}

/// AI panel: interactive generation, batch runs and plugin settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AiPanelState {
    pub status: Option<AiStatus>,
    pub kind: GenerationKind,
    pub mode: GenerationMode,
    pub resume_from_last: bool,
    /// Optional start time typed by the user; blank means from the start.
    pub start_time: String,
    pub batch_selection: String,
    pub batch_log: Vec<String>,
    pub settings_open: bool,
    pub config_text: String,
    pub subtask_prompt: String,
    pub vqa_prompt: String,
}

impl AiPanelState {
    pub fn record_batch_event(&mut self, event: &BatchEvent) {
        push_bounded(&mut self.batch_log, event.log_line(), BATCH_LOG_LIMIT);
    }
}

/// Blocking message shown when the status bar is not enough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub status: StatusBarState,
    pub dataset_form: DatasetFormState,
    pub editor_tab: EditorTab,
    pub export: ExportFormState,
    pub push: PushFormState,
    pub import: ImportFormState,
    pub ai: AiPanelState,
    pub alert: Option<AlertState>,
    pub log_path: Option<String>,
}

impl Default for DatasetFormState {
    fn default() -> Self {
        Self::from_settings("", &DatasetSettings::default())
    }
}

fn push_bounded(log: &mut Vec<String>, line: String, limit: usize) {
    log.push(line);
    if log.len() > limit {
        let excess = log.len() - limit;
        log.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_log_is_bounded() {
        let mut status = StatusBarState::default();
        for idx in 0..(STATUS_LOG_LIMIT + 5) {
            status.set(format!("line {idx}"), StatusTone::Info);
        }
        assert_eq!(status.log.len(), STATUS_LOG_LIMIT);
        assert_eq!(status.log[0], "line 5");
        assert_eq!(status.tone, StatusTone::Info);
    }

    #[test]
    fn dataset_form_round_trips_settings() {
        let settings = DatasetSettings {
            source: DatasetSource::Local,
            local_path: "/data/demo".into(),
            prefetch_annotations: false,
            ..Default::default()
        };
        let form = DatasetFormState::from_settings("http://h:1", &settings);
        assert_eq!(form.server_url, "http://h:1");
        assert_eq!(form.to_settings(), settings);
    }
}
