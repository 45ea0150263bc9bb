use std::sync::mpsc::TryRecvError;

use tracing::warn;

use super::{EguiController, JobMessage};
use crate::egui_app::state::StatusTone;

impl EguiController {
    /// Apply every finished background result. Call once per frame.
    pub fn poll_jobs(&mut self) {
        let batch_exited = self.jobs.take_finished_batch_worker();
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            self.handle_message(message);
        }
        if batch_exited && !self.session.batch().is_idle() {
            warn!("batch worker exited without finishing");
            self.session.abandon_batch();
            self.set_status("Batch run stopped unexpectedly", StatusTone::Error);
        }
    }

    fn handle_message(&mut self, message: JobMessage) {
        let spawned = match &message {
            JobMessage::Batch(_) => false,
            JobMessage::EpisodeFetched { purpose, .. } => !purpose.is_background(),
            _ => true,
        };
        if spawned {
            self.jobs.settle();
        }
        match message {
            JobMessage::DatasetLoaded(result) => match result {
                Ok(summary) => self.on_dataset_loaded(summary),
                Err(err) => self.report("Loading dataset", err),
            },
            JobMessage::VideoTiming(result) => match result {
                Ok(timing) => self.session.apply_video_timing(&timing),
                Err(err) => warn!(error = %err, "video timing unavailable"),
            },
            JobMessage::Saved { episode, result } => match result {
                Ok(()) => self.set_status(format!("Saved episode {episode}"), StatusTone::Info),
                Err(err) => self.report(&format!("Saving episode {episode}"), err),
            },
            JobMessage::Exported(result) => match result {
                Ok(result) => self.on_exported(result),
                Err(err) => self.report("Export", err),
            },
            JobMessage::Pushed(result) => match result {
                Ok(result) => self.on_pushed(result),
                Err(err) => self.report("Push to hub", err),
            },
            JobMessage::Imported { kind, result } => match result {
                Ok(result) => self.on_imported(kind, result),
                Err(err) => self.report(&format!("Importing {}", kind.label()), err),
            },
            JobMessage::AiStatus(result) => match result {
                Ok(status) => self.ui.ai.status = Some(status),
                Err(err) => {
                    warn!(error = %err, "AI status unavailable");
                    self.ui.ai.status = None;
                }
            },
            JobMessage::AiSettingsLoaded(result) => match result {
                Ok(snapshot) => self.on_ai_settings(snapshot, false),
                Err(err) => self.report("Loading AI settings", err),
            },
            JobMessage::AiSettingsSaved(result) => match result {
                Ok(snapshot) => self.on_ai_settings(snapshot, true),
                Err(err) => self.report("Saving AI settings", err),
            },
            JobMessage::Generated {
                kind,
                episode,
                result,
            } => self.on_generated(kind, episode, result),
            JobMessage::EpisodeFetched {
                epoch,
                episode,
                purpose,
                result,
            } => self.on_episode_fetched(epoch, episode, purpose, result),
            JobMessage::Batch(event) => self.on_batch_event(event),
        }
    }
}
