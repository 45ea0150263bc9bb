//! Session operations that talk to the server.

use tracing::{debug, info, warn};

use super::{EditorDrafts, Session, SessionError};
use crate::annotations::{EpisodeAnnotations, EpisodeIndex};
use crate::api::{
    DatasetLoadRequest, DatasetSummary, ExportRequest, ExportResult, GenerationRequest,
    GenerationResult, ImportKind, ImportResult, PushToHubRequest, PushToHubResult, VideoTiming,
};
use crate::generation::{GenerationKind, GenerationOptions};

impl Session {
    pub fn load_dataset(
        &mut self,
        request: &DatasetLoadRequest,
    ) -> Result<&DatasetSummary, SessionError> {
        self.ensure_batch_idle()?;
        let summary = self.backend.load_dataset(request)?;
        self.apply_dataset(summary)
    }

    /// Install a freshly loaded dataset, discarding all episode state.
    pub fn apply_dataset(
        &mut self,
        summary: DatasetSummary,
    ) -> Result<&DatasetSummary, SessionError> {
        self.ensure_batch_idle()?;
        info!(
            dataset = summary.display_name(),
            episodes = summary.episodes.len(),
            "dataset loaded"
        );
        self.video_key = summary.selected_video_key.clone();
        self.clear_episode_state();
        let dataset = self.dataset.insert(summary);
        Ok(&*dataset)
    }

    /// Check that `episode` can become active.
    pub fn begin_select(&self, episode: EpisodeIndex) -> Result<(), SessionError> {
        let dataset = self.require_dataset()?;
        if dataset.episode(episode).is_none() {
            return Err(SessionError::UnknownEpisode(episode));
        }
        Ok(())
    }

    pub fn select_episode(&mut self, episode: EpisodeIndex) -> Result<(), SessionError> {
        self.begin_select(episode)?;
        let annotations = self.backend.fetch_annotations(episode)?;
        self.apply_selected(episode, annotations)
    }

    /// Make `episode` active with the set fetched from the store.
    pub fn apply_selected(
        &mut self,
        episode: EpisodeIndex,
        annotations: EpisodeAnnotations,
    ) -> Result<(), SessionError> {
        self.begin_select(episode)?;
        let duration = self
            .dataset
            .as_ref()
            .and_then(|dataset| dataset.episode(episode))
            .and_then(|meta| meta.playable_duration());
        self.active = Some(episode);
        self.corpus.replace(episode, annotations);
        self.playback.load(duration);
        self.drafts = EditorDrafts::default();
        debug!(episode, ?duration, "episode selected");
        Ok(())
    }

    /// Refine the active episode's playable duration from the server's timing.
    pub fn apply_video_timing(&mut self, timing: &VideoTiming) {
        if self.active != Some(timing.episode_index) {
            return;
        }
        let trimmed = match (timing.video_start_time, timing.video_end_time) {
            (Some(start), Some(end)) if end > start => Some(end - start),
            _ => Some(timing.duration),
        };
        let Some(duration) = trimmed.filter(|d| d.is_finite() && *d > 0.0) else {
            return;
        };
        if self.playback.duration() != Some(duration) {
            let position = self.playback.position();
            self.playback.load(Some(duration));
            self.playback.seek(position);
        }
    }

    pub fn video_timing(&self) -> Result<VideoTiming, SessionError> {
        let episode = self.require_active()?;
        Ok(self.backend.video_timing(episode, self.video_key())?)
    }

    /// Address of the active episode's trimmed video.
    pub fn video_url(&self) -> Result<String, SessionError> {
        let episode = self.require_active()?;
        Ok(self.backend.video_url(episode, self.video_key())?)
    }

    /// Episode and snapshot to persist for the active episode.
    pub fn save_payload(&self) -> Result<(EpisodeIndex, EpisodeAnnotations), SessionError> {
        let episode = self.require_unlocked_active()?;
        Ok((episode, self.corpus.snapshot(episode)))
    }

    pub fn save_active(&self) -> Result<EpisodeIndex, SessionError> {
        let (episode, annotations) = self.save_payload()?;
        self.backend.save_annotations(episode, &annotations)?;
        info!(episode, "annotations saved");
        Ok(episode)
    }

    /// Discard local edits by re-reading the stored set.
    pub fn reset_active(&mut self) -> Result<EpisodeIndex, SessionError> {
        let episode = self.require_unlocked_active()?;
        let annotations = self.backend.fetch_annotations(episode)?;
        self.apply_reload(episode, annotations);
        Ok(episode)
    }

    /// Replace an episode's set with the stored copy after a server-side change.
    ///
    /// Every episode of the dataset keeps a local copy so the label index stays
    /// corpus-wide; playback is left where it is.
    pub fn apply_reload(&mut self, episode: EpisodeIndex, annotations: EpisodeAnnotations) -> bool {
        if self.dataset.as_ref().and_then(|d| d.episode(episode)).is_none() {
            return false;
        }
        self.corpus.replace(episode, annotations);
        true
    }

    /// Re-read one episode from the store and replace the local copy.
    pub fn reload_episode(&mut self, episode: EpisodeIndex) -> Result<(), SessionError> {
        self.require_dataset()?;
        let annotations = self.backend.fetch_annotations(episode)?;
        self.apply_reload(episode, annotations);
        Ok(())
    }

    /// Episodes that have a local copy, in dataset order.
    pub fn known_episodes(&self) -> Vec<EpisodeIndex> {
        self.episode_indices()
            .into_iter()
            .filter(|episode| self.corpus.contains(*episode))
            .collect()
    }

    /// Episodes with no local copy yet, in dataset order.
    pub fn prefetch_targets(&self) -> Vec<EpisodeIndex> {
        self.episode_indices()
            .into_iter()
            .filter(|episode| !self.corpus.contains(*episode))
            .collect()
    }

    /// Store a background-fetched set unless the episode is already known.
    pub fn apply_prefetched(&mut self, episode: EpisodeIndex, annotations: EpisodeAnnotations) -> bool {
        if self.dataset.as_ref().and_then(|d| d.episode(episode)).is_none() {
            return false;
        }
        self.corpus.insert_if_absent(episode, annotations)
    }

    pub fn prefetch_all(&mut self) -> usize {
        let mut stored = 0;
        for episode in self.prefetch_targets() {
            match self.backend.fetch_annotations(episode) {
                Ok(annotations) => {
                    if self.apply_prefetched(episode, annotations) {
                        stored += 1;
                    }
                }
                Err(err) => warn!(episode, error = %err, "prefetch failed"),
            }
        }
        stored
    }

    pub fn export(&self, request: &ExportRequest) -> Result<ExportResult, SessionError> {
        self.require_dataset()?;
        Ok(self.backend.export(request)?)
    }

    pub fn push_to_hub(&self, request: &PushToHubRequest) -> Result<PushToHubResult, SessionError> {
        self.require_dataset()?;
        Ok(self.backend.push_to_hub(request)?)
    }

    /// Import annotations from a folder, then re-read every known episode.
    pub fn import_from_root(
        &mut self,
        kind: ImportKind,
        root_path: &str,
    ) -> Result<ImportResult, SessionError> {
        self.ensure_batch_idle()?;
        self.require_dataset()?;
        let result = self.backend.import_from_root(kind, root_path)?;
        for episode in self.known_episodes() {
            self.reload_episode(episode)?;
        }
        Ok(result)
    }

    /// Request for a one-off generation on the active episode.
    pub fn generation_request(
        &self,
        kind: GenerationKind,
        options: GenerationOptions,
    ) -> Result<GenerationRequest, SessionError> {
        let episode = self.require_unlocked_active()?;
        Ok(self.params.request(kind, episode, options)?)
    }

    /// Generate for the active episode and reload it from the store.
    pub fn generate_active(
        &mut self,
        kind: GenerationKind,
        options: GenerationOptions,
    ) -> Result<GenerationResult, SessionError> {
        let request = self.generation_request(kind, options)?;
        let result = self.backend.generate(&request)?;
        let episode = request.episode_index();
        info!(episode, kind = kind.label(), count = result.count, "generation done");
        let annotations = self.backend.fetch_annotations(episode)?;
        self.apply_reload(episode, annotations);
        Ok(result)
    }

    fn ensure_batch_idle(&self) -> Result<(), SessionError> {
        if self.batch.is_idle() {
            Ok(())
        } else {
            Err(SessionError::BatchBusy)
        }
    }
}
