use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::BatchEvent;
use crate::annotations::EpisodeIndex;
use crate::generation::GenerationKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchState {
    #[default]
    Idle,
    Running(GenerationKind),
    Canceling(GenerationKind),
}

/// UI-side view of the single batch run allowed per process.
#[derive(Debug, Default)]
pub struct BatchControl {
    state: BatchState,
    cancel: Arc<AtomicBool>,
    in_flight: Option<EpisodeIndex>,
}

impl BatchControl {
    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == BatchState::Idle
    }

    /// Enter `Running` and hand out a fresh cancel flag, or `None` when a run
    /// is already active.
    pub fn try_start(&mut self, kind: GenerationKind) -> Option<Arc<AtomicBool>> {
        if !self.is_idle() {
            return None;
        }
        self.cancel = Arc::new(AtomicBool::new(false));
        self.state = BatchState::Running(kind);
        self.in_flight = None;
        Some(Arc::clone(&self.cancel))
    }

    /// Ask the worker to stop before its next item.
    pub fn request_cancel(&mut self) -> bool {
        match self.state {
            BatchState::Running(kind) => {
                self.cancel.store(true, Ordering::Release);
                self.state = BatchState::Canceling(kind);
                true
            }
            BatchState::Idle | BatchState::Canceling(_) => false,
        }
    }

    /// Episode whose generation request has been sent but not settled.
    pub fn in_flight(&self) -> Option<EpisodeIndex> {
        self.in_flight
    }

    pub fn is_locked(&self, episode: EpisodeIndex) -> bool {
        self.in_flight == Some(episode)
    }

    pub fn observe(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::ItemStarted { episode, .. } => self.in_flight = Some(*episode),
            BatchEvent::ItemSucceeded { .. } | BatchEvent::ItemFailed(_) => self.in_flight = None,
            BatchEvent::Finished(_) => {
                self.in_flight = None;
                self.state = BatchState::Idle;
            }
        }
    }

    /// Return to idle when the worker vanished without a final event.
    pub fn abandon(&mut self) {
        self.cancel.store(true, Ordering::Release);
        self.in_flight = None;
        self.state = BatchState::Idle;
    }
}
