//! Wiring between the session and batch runs.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::warn;

use super::{Session, SessionError};
use crate::annotations::EpisodeIndex;
use crate::batch::{BatchEvent, BatchPlan, BatchSummary, parse_episode_selection, run_batch};
use crate::generation::GenerationKind;

/// Everything a worker thread needs to run a batch.
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub plan: BatchPlan,
    pub cancel: Arc<AtomicBool>,
}

/// Work the caller must do after the session has seen a batch event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchFollowUp {
    None,
    /// The server rewrote this episode; fetch it again so the corpus stays complete.
    Reload(EpisodeIndex),
}

impl Session {
    /// Validate the selection and parameters and move the batch to running.
    pub fn start_batch(
        &mut self,
        kind: GenerationKind,
        selection: &str,
    ) -> Result<BatchJob, SessionError> {
        self.require_dataset()?;
        if !self.batch.is_idle() {
            return Err(SessionError::BatchBusy);
        }
        let episodes = parse_episode_selection(selection, &self.episode_indices())?;
        let plan = BatchPlan::new(kind, episodes, self.params.clone(), self.batch_pause)?;
        let cancel = self.batch.try_start(kind).ok_or(SessionError::BatchBusy)?;
        Ok(BatchJob { plan, cancel })
    }

    pub fn cancel_batch(&mut self) -> bool {
        self.batch.request_cancel()
    }

    /// Recover when the batch worker disappeared without finishing.
    pub fn abandon_batch(&mut self) {
        self.batch.abandon();
    }

    pub fn handle_batch_event(&mut self, event: &BatchEvent) -> BatchFollowUp {
        self.batch.observe(event);
        match event {
            BatchEvent::ItemSucceeded { episode, .. } => BatchFollowUp::Reload(*episode),
            _ => BatchFollowUp::None,
        }
    }

    /// Run a whole batch on the calling thread, reloading each episode as its
    /// item completes.
    pub fn run_batch_blocking(
        &mut self,
        kind: GenerationKind,
        selection: &str,
    ) -> Result<BatchSummary, SessionError> {
        let job = self.start_batch(kind, selection)?;
        let backend = self.backend();
        let summary = run_batch(&*backend, &job.plan, &job.cancel, |event| {
            if let BatchFollowUp::Reload(episode) = self.handle_batch_event(&event) {
                match backend.fetch_annotations(episode) {
                    Ok(annotations) => {
                        self.apply_reload(episode, annotations);
                    }
                    Err(err) => warn!(episode, error = %err, "reload after batch item failed"),
                }
            }
        });
        Ok(summary)
    }
}
