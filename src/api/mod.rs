//! Client side of the annotation server's HTTP contract.
//!
//! The session and batch runner only see the traits below, so tests can swap
//! in scripted backends.

pub mod error;
pub mod http;
pub mod types;

pub use error::ApiError;
pub use http::HttpBackend;
pub use types::*;

use crate::annotations::{EpisodeAnnotations, EpisodeIndex};

/// Per-episode annotation persistence.
pub trait AnnotationStore: Send + Sync {
    fn fetch_annotations(&self, episode: EpisodeIndex) -> Result<EpisodeAnnotations, ApiError>;

    fn save_annotations(
        &self,
        episode: EpisodeIndex,
        annotations: &EpisodeAnnotations,
    ) -> Result<(), ApiError>;
}

/// AI segment generation; results are written server-side.
pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ApiError>;
}

/// Dataset-level operations and AI plugin settings.
pub trait DatasetService: Send + Sync {
    fn load_dataset(&self, request: &DatasetLoadRequest) -> Result<DatasetSummary, ApiError>;
    fn dataset_info(&self) -> Result<DatasetSummary, ApiError>;
    fn video_timing(
        &self,
        episode: EpisodeIndex,
        video_key: Option<&str>,
    ) -> Result<VideoTiming, ApiError>;
    /// Address of the trimmed episode video, for opening in a browser.
    fn video_url(&self, episode: EpisodeIndex, video_key: Option<&str>) -> Result<String, ApiError>;
    fn export(&self, request: &ExportRequest) -> Result<ExportResult, ApiError>;
    fn push_to_hub(&self, request: &PushToHubRequest) -> Result<PushToHubResult, ApiError>;
    fn import_from_root(&self, kind: ImportKind, root_path: &str)
    -> Result<ImportResult, ApiError>;
    fn ai_status(&self) -> Result<AiStatus, ApiError>;
    fn ai_config(&self) -> Result<serde_json::Map<String, serde_json::Value>, ApiError>;
    fn put_ai_config(
        &self,
        config: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ApiError>;
    fn prompt(&self, kind: PromptKind) -> Result<String, ApiError>;
    fn put_prompt(&self, kind: PromptKind, text: &str) -> Result<String, ApiError>;
}

/// Everything the session needs from the server.
pub trait Backend: AnnotationStore + Generator + DatasetService {}

impl<T: AnnotationStore + Generator + DatasetService> Backend for T {}
