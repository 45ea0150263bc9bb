use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use robolabel::annotations::{Episode, EpisodeAnnotations, EpisodeIndex, SubtaskSegment};
use robolabel::api::{
    AiStatus, AnnotationStore, ApiError, DatasetLoadRequest, DatasetService, DatasetSummary,
    ExportRequest, ExportResult, GenerationRequest, GenerationResult, Generator, ImportKind,
    ImportResult, PromptKind, PushToHubRequest, PushToHubResult, VideoTiming,
};

/// Label written into an episode by every successful fake generation.
pub const GENERATED_LABEL: &str = "generated step";

#[derive(Default)]
struct FakeState {
    stored: HashMap<EpisodeIndex, EpisodeAnnotations>,
    fetches: Vec<EpisodeIndex>,
    saves: Vec<EpisodeIndex>,
    generated: Vec<EpisodeIndex>,
    failing: HashSet<EpisodeIndex>,
}

/// In-memory server: a dataset of ten-second episodes at 30 fps.
pub struct FakeBackend {
    summary: DatasetSummary,
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_episodes(count: u32) -> Arc<Self> {
        let episodes = (0..count)
            .map(|episode_index| Episode {
                episode_index,
                length: 300,
                duration: 10.0,
                video_start_time: None,
                video_end_time: None,
            })
            .collect();
        Arc::new(Self {
            summary: DatasetSummary {
                repo_id: Some("lab/pick-place".into()),
                fps: Some(30.0),
                video_keys: vec!["observation.images.top".into()],
                selected_video_key: Some("observation.images.top".into()),
                episodes,
                ..Default::default()
            },
            state: Mutex::new(FakeState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn store(&self, episode: EpisodeIndex, labels: &[(&str, f64, f64)]) {
        let subtasks = labels
            .iter()
            .map(|(label, start, end)| SubtaskSegment {
                start: *start,
                end: *end,
                label: label.to_string(),
            })
            .collect();
        self.state().stored.insert(
            episode,
            EpisodeAnnotations {
                subtasks,
                ..Default::default()
            },
        );
    }

    pub fn stored(&self, episode: EpisodeIndex) -> EpisodeAnnotations {
        self.state().stored.get(&episode).cloned().unwrap_or_default()
    }

    pub fn fail_generation_for(&self, episode: EpisodeIndex) {
        self.state().failing.insert(episode);
    }

    pub fn fetches(&self) -> Vec<EpisodeIndex> {
        self.state().fetches.clone()
    }

    pub fn saves(&self) -> Vec<EpisodeIndex> {
        self.state().saves.clone()
    }

    pub fn generated(&self) -> Vec<EpisodeIndex> {
        self.state().generated.clone()
    }
}

impl AnnotationStore for FakeBackend {
    fn fetch_annotations(&self, episode: EpisodeIndex) -> Result<EpisodeAnnotations, ApiError> {
        let mut state = self.state();
        state.fetches.push(episode);
        Ok(state.stored.get(&episode).cloned().unwrap_or_default())
    }

    fn save_annotations(
        &self,
        episode: EpisodeIndex,
        annotations: &EpisodeAnnotations,
    ) -> Result<(), ApiError> {
        let mut state = self.state();
        state.saves.push(episode);
        state.stored.insert(episode, annotations.clone());
        Ok(())
    }
}

impl Generator for FakeBackend {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ApiError> {
        let episode = request.episode_index();
        let mut state = self.state();
        state.generated.push(episode);
        if state.failing.contains(&episode) {
            return Err(ApiError::Server {
                status: 500,
                detail: "model unavailable".into(),
            });
        }
        state
            .stored
            .entry(episode)
            .or_default()
            .subtasks
            .push(SubtaskSegment {
                start: 0.0,
                end: 2.0,
                label: GENERATED_LABEL.into(),
            });
        Ok(GenerationResult {
            episode_index: Some(episode),
            count: 1,
        })
    }
}

impl DatasetService for FakeBackend {
    fn load_dataset(&self, _request: &DatasetLoadRequest) -> Result<DatasetSummary, ApiError> {
        Ok(self.summary.clone())
    }

    fn dataset_info(&self) -> Result<DatasetSummary, ApiError> {
        Ok(self.summary.clone())
    }

    fn video_timing(
        &self,
        episode: EpisodeIndex,
        _video_key: Option<&str>,
    ) -> Result<VideoTiming, ApiError> {
        Ok(VideoTiming {
            episode_index: episode,
            fps: Some(30.0),
            length: 300,
            duration: 10.0,
            video_start_time: None,
            video_end_time: None,
        })
    }

    fn video_url(&self, episode: EpisodeIndex, _video_key: Option<&str>) -> Result<String, ApiError> {
        Ok(format!("http://fake/api/episodes/{episode}/video"))
    }

    fn export(&self, request: &ExportRequest) -> Result<ExportResult, ApiError> {
        Ok(ExportResult {
            output_dir: request.output_dir.clone().unwrap_or_else(|| "/tmp/export".into()),
            ..Default::default()
        })
    }

    fn push_to_hub(&self, _request: &PushToHubRequest) -> Result<PushToHubResult, ApiError> {
        Ok(PushToHubResult {
            message: "pushed".into(),
            ..Default::default()
        })
    }

    fn import_from_root(
        &self,
        _kind: ImportKind,
        _root_path: &str,
    ) -> Result<ImportResult, ApiError> {
        Ok(ImportResult::default())
    }

    fn ai_status(&self) -> Result<AiStatus, ApiError> {
        Ok(AiStatus {
            enabled: true,
            ..Default::default()
        })
    }

    fn ai_config(&self) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        Ok(serde_json::Map::new())
    }

    fn put_ai_config(
        &self,
        config: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        Ok(config.clone())
    }

    fn prompt(&self, _kind: PromptKind) -> Result<String, ApiError> {
        Ok(String::new())
    }

    fn put_prompt(&self, _kind: PromptKind, text: &str) -> Result<String, ApiError> {
        Ok(text.to_string())
    }
}
