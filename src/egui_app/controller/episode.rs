//! Active-episode actions: selection, save/reset and editor commits.

use std::time::Duration;

use tracing::{debug, warn};

use super::{EguiController, FetchPurpose, JobMessage};
use crate::annotations::{EpisodeAnnotations, EpisodeIndex, HighLevelSegment, QaLabel, SubtaskSegment};
use crate::api::ApiError;
use crate::egui_app::state::StatusTone;
use crate::session::SessionError;

impl EguiController {
    pub fn select_episode(&mut self, episode: EpisodeIndex) {
        if let Err(err) = self.session.begin_select(episode) {
            self.report_session("Selecting episode", err);
            return;
        }
        self.jobs.pending_select = Some(episode);
        self.spawn_fetch(episode, FetchPurpose::Select);
        self.set_status(format!("Loading episode {episode}..."), StatusTone::Busy);
    }

    /// Re-read one episode from the store after the server rewrote it.
    pub(super) fn reload_episode(&mut self, episode: EpisodeIndex) {
        self.spawn_fetch(episode, FetchPurpose::Reload);
    }

    fn spawn_fetch(&mut self, episode: EpisodeIndex, purpose: FetchPurpose) {
        let backend = self.session.backend();
        let epoch = self.jobs.epoch;
        self.jobs.spawn(move || JobMessage::EpisodeFetched {
            epoch,
            episode,
            purpose,
            result: backend.fetch_annotations(episode),
        });
    }

    pub(super) fn on_episode_fetched(
        &mut self,
        epoch: u64,
        episode: EpisodeIndex,
        purpose: FetchPurpose,
        result: Result<EpisodeAnnotations, ApiError>,
    ) {
        if epoch != self.jobs.epoch {
            debug!(episode, "dropping fetch from a previous dataset");
            return;
        }
        match (purpose, result) {
            (FetchPurpose::Select, Ok(annotations)) => {
                if self.jobs.pending_select != Some(episode) {
                    return;
                }
                self.jobs.pending_select = None;
                match self.session.apply_selected(episode, annotations) {
                    Ok(()) => {
                        self.set_status(format!("Episode {episode}"), StatusTone::Info);
                        self.fetch_video_timing();
                    }
                    Err(err) => self.report_session("Selecting episode", err),
                }
            }
            (FetchPurpose::Select, Err(err)) => {
                if self.jobs.pending_select == Some(episode) {
                    self.jobs.pending_select = None;
                }
                self.report(&format!("Loading episode {episode}"), err);
            }
            (FetchPurpose::Reload | FetchPurpose::Refresh, Ok(annotations)) => {
                self.session.apply_reload(episode, annotations);
            }
            (FetchPurpose::Revert, Ok(annotations)) => {
                self.session.apply_reload(episode, annotations);
                self.set_status(format!("Episode {episode} reverted"), StatusTone::Info);
            }
            (FetchPurpose::Reload | FetchPurpose::Revert, Err(err)) => {
                self.report(&format!("Reloading episode {episode}"), err);
            }
            (FetchPurpose::Prefetch, Ok(annotations)) => {
                self.session.apply_prefetched(episode, annotations);
            }
            (FetchPurpose::Prefetch | FetchPurpose::Refresh, Err(err)) => {
                warn!(episode, error = %err, "background fetch failed");
            }
        }
    }

    fn fetch_video_timing(&mut self) {
        let Some(episode) = self.session.active_episode() else {
            return;
        };
        let backend = self.session.backend();
        let video_key = self.session.video_key().map(str::to_string);
        self.jobs.spawn(move || {
            JobMessage::VideoTiming(backend.video_timing(episode, video_key.as_deref()))
        });
    }

    pub fn save_active(&mut self) {
        let (episode, annotations) = match self.session.save_payload() {
            Ok(payload) => payload,
            Err(err) => {
                self.report_session("Saving", err);
                return;
            }
        };
        let backend = self.session.backend();
        self.set_status(format!("Saving episode {episode}..."), StatusTone::Busy);
        self.jobs.spawn(move || JobMessage::Saved {
            episode,
            result: backend.save_annotations(episode, &annotations),
        });
    }

    /// Discard local edits of the active episode.
    pub fn reset_active(&mut self) {
        match self.session.save_payload() {
            Ok((episode, _)) => {
                self.spawn_fetch(episode, FetchPurpose::Revert);
                self.set_status(format!("Reverting episode {episode}..."), StatusTone::Busy);
            }
            Err(err) => self.report_session("Resetting", err),
        }
    }

    pub fn open_video(&mut self) {
        match self.session.video_url() {
            Ok(url) => {
                if let Err(err) = open::that(&url) {
                    self.report("Opening video", err);
                }
            }
            Err(err) => self.report_session("Opening video", err),
        }
    }

    pub fn tick_playback(&mut self, elapsed: Duration) {
        self.session.playback_mut().advance(elapsed);
    }

    pub fn add_subtask(&mut self) {
        let result = self.session.commit_subtask_draft();
        self.after_edit("Adding subtask", result);
    }

    pub fn add_high_level(&mut self) {
        let result = self.session.commit_high_level_draft();
        self.after_edit("Adding high-level segment", result);
    }

    pub fn add_qa_label(&mut self) {
        let result = self.session.commit_qa_draft();
        self.after_edit("Adding QA label", result);
    }

    pub fn update_subtask(&mut self, index: usize, segment: &SubtaskSegment) {
        let result = self.session.update_subtask(index, segment);
        self.after_edit("Editing subtask", result);
    }

    pub fn update_high_level(&mut self, index: usize, segment: HighLevelSegment) {
        let result = self.session.update_high_level(index, segment);
        self.after_edit("Editing high-level segment", result);
    }

    pub fn update_qa_label(&mut self, index: usize, label: QaLabel) {
        let result = self.session.update_qa_label(index, label);
        self.after_edit("Editing QA label", result);
    }

    pub fn delete_subtask(&mut self, index: usize) {
        let result = self.session.delete_subtask(index);
        self.after_edit("Deleting subtask", result);
    }

    pub fn delete_high_level(&mut self, index: usize) {
        let result = self.session.delete_high_level(index);
        self.after_edit("Deleting high-level segment", result);
    }

    pub fn delete_qa_label(&mut self, index: usize) {
        let result = self.session.delete_qa_label(index);
        self.after_edit("Deleting QA label", result);
    }

    /// Invalid input is dropped silently; refused edits are reported.
    fn after_edit(&mut self, action: &str, result: Result<bool, SessionError>) {
        if let Err(err) = result {
            self.report_session(action, err);
        }
    }
}
