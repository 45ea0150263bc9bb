//! The dataset session: one server connection, one active episode, and the
//! annotation corpus everything else renders from.
//!
//! Remote work comes in two shapes. Blocking methods (`load_dataset`,
//! `select_episode`, ...) call the backend and apply the result in one go.
//! The UI instead runs the backend call on a worker thread and hands the
//! result to the matching `apply_*` method, so all mutation still happens
//! here on the UI thread.

mod batch;
mod editing;
mod remote;

pub use batch::{BatchFollowUp, BatchJob};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::annotations::{
    AnnotationCorpus, EpisodeAnnotations, EpisodeIndex, ExportPreview, HighLevelDraft,
    LabelIndexMap, QaDraft, SubtaskDraft, frame_at,
};
use crate::api::{ApiError, Backend, DatasetSummary};
use crate::batch::{BatchControl, SelectionError};
use crate::generation::GenerationParams;
use crate::playback::PlaybackClock;
use crate::timeline::{self, TimelineBlock};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No dataset loaded")]
    NoDataset,
    #[error("No episode selected")]
    NoActiveEpisode,
    #[error("Episode {0} is not in the dataset")]
    UnknownEpisode(EpisodeIndex),
    #[error("Episode {0} is being regenerated by the running batch")]
    EpisodeLocked(EpisodeIndex),
    #[error("A batch run is already in progress")]
    BatchBusy,
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Text typed into the three editors' add rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorDrafts {
    pub subtask: SubtaskDraft,
    pub high_level: HighLevelDraft,
    pub qa: QaDraft,
}

pub struct Session {
    backend: Arc<dyn Backend>,
    dataset: Option<DatasetSummary>,
    video_key: Option<String>,
    active: Option<EpisodeIndex>,
    corpus: AnnotationCorpus,
    playback: PlaybackClock,
    batch: BatchControl,
    /// Generation parameters shared by interactive and batch runs.
    pub params: GenerationParams,
    pub batch_pause: Duration,
    /// Reset whenever a different episode becomes active.
    pub drafts: EditorDrafts,
}

impl Session {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            dataset: None,
            video_key: None,
            active: None,
            corpus: AnnotationCorpus::new(),
            playback: PlaybackClock::default(),
            batch: BatchControl::default(),
            params: GenerationParams::default(),
            batch_pause: Duration::from_millis(50),
            drafts: EditorDrafts::default(),
        }
    }

    /// Shared handle for worker threads.
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Swap the server connection; the loaded dataset is dropped with it.
    pub fn set_backend(&mut self, backend: Arc<dyn Backend>) -> Result<(), SessionError> {
        if !self.batch.is_idle() {
            return Err(SessionError::BatchBusy);
        }
        self.backend = backend;
        self.dataset = None;
        self.video_key = None;
        self.clear_episode_state();
        Ok(())
    }

    pub fn dataset(&self) -> Option<&DatasetSummary> {
        self.dataset.as_ref()
    }

    pub fn episode_indices(&self) -> Vec<EpisodeIndex> {
        self.dataset
            .as_ref()
            .map(|dataset| dataset.episodes.iter().map(|e| e.episode_index).collect())
            .unwrap_or_default()
    }

    pub fn video_key(&self) -> Option<&str> {
        self.video_key.as_deref()
    }

    pub fn set_video_key(&mut self, key: Option<String>) {
        self.video_key = key.filter(|key| !key.trim().is_empty());
    }

    pub fn active_episode(&self) -> Option<EpisodeIndex> {
        self.active
    }

    pub fn active_annotations(&self) -> Option<&EpisodeAnnotations> {
        self.corpus.episode(self.active?)
    }

    pub fn corpus(&self) -> &AnnotationCorpus {
        &self.corpus
    }

    /// Corpus-wide label indices shared by the timeline and the editors.
    pub fn label_index(&self) -> &LabelIndexMap {
        self.corpus.label_index()
    }

    pub fn playback(&self) -> &PlaybackClock {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackClock {
        &mut self.playback
    }

    pub fn batch(&self) -> &BatchControl {
        &self.batch
    }

    pub fn fps(&self) -> Option<f64> {
        self.dataset.as_ref().and_then(|dataset| dataset.fps)
    }

    /// Playback position in seconds.
    pub fn current_time(&self) -> f64 {
        self.playback.position()
    }

    pub fn current_frame(&self) -> u32 {
        frame_at(self.current_time(), self.fps())
    }

    /// Timeline blocks for the active episode, if anything can be drawn.
    pub fn timeline(&self) -> Option<Vec<TimelineBlock>> {
        let annotations = self.active_annotations()?;
        timeline::layout(
            &annotations.subtasks,
            self.playback.duration(),
            self.corpus.label_index(),
        )
    }

    pub fn export_preview(&self) -> ExportPreview {
        ExportPreview::from_corpus(&self.corpus)
    }

    fn require_dataset(&self) -> Result<&DatasetSummary, SessionError> {
        self.dataset.as_ref().ok_or(SessionError::NoDataset)
    }

    fn require_active(&self) -> Result<EpisodeIndex, SessionError> {
        self.require_dataset()?;
        self.active.ok_or(SessionError::NoActiveEpisode)
    }

    /// Active episode, refused while the batch is regenerating it.
    fn require_unlocked_active(&self) -> Result<EpisodeIndex, SessionError> {
        let episode = self.require_active()?;
        if self.batch.is_locked(episode) {
            return Err(SessionError::EpisodeLocked(episode));
        }
        Ok(episode)
    }

    fn clear_episode_state(&mut self) {
        self.active = None;
        self.corpus.clear();
        self.playback.load(None);
        self.drafts = EditorDrafts::default();
    }
}
