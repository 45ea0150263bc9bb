//! Request and response bodies exchanged with the annotation server.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotations::{Episode, EpisodeAnnotations, EpisodeIndex};

/// Where the server should read the dataset from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetSource {
    /// Hugging Face hub repository.
    #[default]
    #[serde(rename = "hf")]
    Hub,
    #[serde(rename = "local")]
    Local,
}

impl DatasetSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hub => "Hub",
            Self::Local => "Local folder",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetLoadRequest {
    pub source: DatasetSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_key: Option<String>,
}

/// Dataset description returned by load and info calls.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DatasetSummary {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub repo_id: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub video_keys: Vec<String>,
    #[serde(default)]
    pub selected_video_key: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

impl DatasetSummary {
    /// Human-readable dataset name for status text.
    pub fn display_name(&self) -> &str {
        self.repo_id
            .as_deref()
            .or(self.root.as_deref())
            .unwrap_or("dataset")
    }

    pub fn episode(&self, index: EpisodeIndex) -> Option<&Episode> {
        self.episodes
            .iter()
            .find(|episode| episode.episode_index == index)
    }
}

#[derive(Serialize)]
pub(crate) struct SaveAnnotationsBody<'a> {
    pub episode_index: EpisodeIndex,
    #[serde(flatten)]
    pub annotations: &'a EpisodeAnnotations,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OkResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Timing of one episode inside its (possibly concatenated) source video.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct VideoTiming {
    #[serde(default)]
    pub episode_index: EpisodeIndex,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub video_start_time: Option<f64>,
    #[serde(default)]
    pub video_end_time: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExportRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    pub copy_videos: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ExportResult {
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub subtasks: usize,
    #[serde(default)]
    pub tasks_high_level: usize,
    #[serde(default)]
    pub qa_labels: Option<usize>,
}

#[derive(Clone, PartialEq, Serialize)]
pub struct PushToHubRequest {
    pub hf_token: String,
    pub push_in_place: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_repo_id: Option<String>,
    pub private: bool,
    pub commit_message: String,
}

impl fmt::Debug for PushToHubRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushToHubRequest")
            .field("hf_token", &"<redacted>")
            .field("push_in_place", &self.push_in_place)
            .field("new_repo_id", &self.new_repo_id)
            .field("private", &self.private)
            .field("commit_message", &self.commit_message)
            .finish()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PushToHubResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub repo_id: Option<String>,
}

/// Which annotation kind an import-from-root call fills in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Subtasks,
    QaLabels,
}

impl ImportKind {
    pub(crate) fn endpoint(self) -> &'static str {
        match self {
            Self::Subtasks => "api/import/subtasks_from_root",
            Self::QaLabels => "api/import/qa_from_root",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Subtasks => "subtasks",
            Self::QaLabels => "QA labels",
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ImportRequest<'a> {
    pub root_path: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub episodes_updated: usize,
    #[serde(default)]
    pub segments: Option<usize>,
    #[serde(default)]
    pub qa_labels: Option<usize>,
    #[serde(default)]
    pub missing_samples: usize,
}

impl ImportResult {
    pub fn imported_items(&self) -> usize {
        self.segments.or(self.qa_labels).unwrap_or_default()
    }
}

/// Availability of the AI plugin on the server.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AiStatus {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub prompts_dir: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct ConfigPayload {
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct PromptPayload {
    #[serde(default)]
    pub text: String,
}

/// Editable prompt files of the AI plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    Subtask,
    Vqa,
}

impl PromptKind {
    pub(crate) fn endpoint(self) -> &'static str {
        match self {
            Self::Subtask => "api/ai/prompts/subtask",
            Self::Vqa => "api/ai/prompts/vqa",
        }
    }
}

/// Whether generated segments overwrite or extend the episode's list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Replace,
    Append,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubtasksRequest {
    pub episode_index: EpisodeIndex,
    pub stride_s: f64,
    pub summary_frames: u32,
    pub segment_frames: u32,
    pub max_steps: u32,
    pub mode: GenerationMode,
    pub resume_from_last: bool,
    pub merge_adjacent: bool,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_s: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FakeVqaRequest {
    pub episode_index: EpisodeIndex,
    pub stride_s: f64,
    pub window_s: f64,
    pub window_frames: u32,
    pub mode: GenerationMode,
    pub resume_from_last: bool,
    pub language: String,
    pub scenario_type: String,
    pub response_type: String,
    pub skill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_s: Option<f64>,
}

/// A validated generation call for a single episode.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationRequest {
    Subtasks(SubtasksRequest),
    FakeVqa(FakeVqaRequest),
}

impl GenerationRequest {
    pub fn episode_index(&self) -> EpisodeIndex {
        match self {
            Self::Subtasks(request) => request.episode_index,
            Self::FakeVqa(request) => request.episode_index,
        }
    }

    pub(crate) fn endpoint(&self) -> &'static str {
        match self {
            Self::Subtasks(_) => "api/ai/subtasks",
            Self::FakeVqa(_) => "api/ai/fake_vqa",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub episode_index: Option<EpisodeIndex>,
    #[serde(default)]
    pub count: usize,
}
