//! Backend that refuses every call, used when no server address is usable.

use crate::annotations::{EpisodeAnnotations, EpisodeIndex};
use crate::api::*;

pub(super) struct NoServer;

fn offline<T>() -> Result<T, ApiError> {
    Err(ApiError::InvalidUrl("no server configured".into()))
}

impl AnnotationStore for NoServer {
    fn fetch_annotations(&self, _: EpisodeIndex) -> Result<EpisodeAnnotations, ApiError> {
        offline()
    }
    fn save_annotations(&self, _: EpisodeIndex, _: &EpisodeAnnotations) -> Result<(), ApiError> {
        offline()
    }
}

impl Generator for NoServer {
    fn generate(&self, _: &GenerationRequest) -> Result<GenerationResult, ApiError> {
        offline()
    }
}

impl DatasetService for NoServer {
    fn load_dataset(&self, _: &DatasetLoadRequest) -> Result<DatasetSummary, ApiError> {
        offline()
    }
    fn dataset_info(&self) -> Result<DatasetSummary, ApiError> {
        offline()
    }
    fn video_timing(&self, _: EpisodeIndex, _: Option<&str>) -> Result<VideoTiming, ApiError> {
        offline()
    }
    fn video_url(&self, _: EpisodeIndex, _: Option<&str>) -> Result<String, ApiError> {
        offline()
    }
    fn export(&self, _: &ExportRequest) -> Result<ExportResult, ApiError> {
        offline()
    }
    fn push_to_hub(&self, _: &PushToHubRequest) -> Result<PushToHubResult, ApiError> {
        offline()
    }
    fn import_from_root(&self, _: ImportKind, _: &str) -> Result<ImportResult, ApiError> {
        offline()
    }
    fn ai_status(&self) -> Result<AiStatus, ApiError> {
        offline()
    }
    fn ai_config(&self) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        offline()
    }
    fn put_ai_config(
        &self,
        _: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ApiError> {
        offline()
    }
    fn prompt(&self, _: PromptKind) -> Result<String, ApiError> {
        offline()
    }
    fn put_prompt(&self, _: PromptKind, _: &str) -> Result<String, ApiError> {
        offline()
    }
}
