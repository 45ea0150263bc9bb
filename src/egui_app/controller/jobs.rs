//! Background work: every server call runs on its own thread and reports
//! back through one channel that the controller drains each frame.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::annotations::{EpisodeAnnotations, EpisodeIndex};
use crate::api::{
    AiStatus, ApiError, DatasetSummary, ExportResult, GenerationResult, ImportKind, ImportResult,
    PushToHubResult, VideoTiming,
};
use crate::batch::BatchEvent;
use crate::generation::GenerationKind;

/// Why an episode's annotations were fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FetchPurpose {
    Select,
    /// Re-read of one episode after the server rewrote it.
    Reload,
    /// User asked to discard local edits.
    Revert,
    Prefetch,
    /// Background re-read of every known episode after a bulk server change.
    Refresh,
}

impl FetchPurpose {
    /// Fetches delivered by a sequential background thread rather than [`ControllerJobs::spawn`].
    pub(crate) fn is_background(self) -> bool {
        matches!(self, Self::Prefetch | Self::Refresh)
    }
}

/// AI plugin config plus both prompt texts.
#[derive(Clone, Debug, Default)]
pub(crate) struct AiSettingsSnapshot {
    pub config: serde_json::Map<String, serde_json::Value>,
    pub subtask_prompt: String,
    pub vqa_prompt: String,
}

pub(crate) enum JobMessage {
    DatasetLoaded(Result<DatasetSummary, ApiError>),
    EpisodeFetched {
        epoch: u64,
        episode: EpisodeIndex,
        purpose: FetchPurpose,
        result: Result<EpisodeAnnotations, ApiError>,
    },
    VideoTiming(Result<VideoTiming, ApiError>),
    Saved {
        episode: EpisodeIndex,
        result: Result<(), ApiError>,
    },
    Exported(Result<ExportResult, ApiError>),
    Pushed(Result<PushToHubResult, ApiError>),
    Imported {
        kind: ImportKind,
        result: Result<ImportResult, ApiError>,
    },
    AiStatus(Result<AiStatus, ApiError>),
    AiSettingsLoaded(Result<AiSettingsSnapshot, ApiError>),
    AiSettingsSaved(Result<AiSettingsSnapshot, ApiError>),
    Generated {
        kind: GenerationKind,
        episode: EpisodeIndex,
        result: Result<GenerationResult, ApiError>,
    },
    Batch(BatchEvent),
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    /// Bumped on every dataset load; fetches from older datasets are dropped.
    pub(crate) epoch: u64,
    pub(crate) pending_select: Option<EpisodeIndex>,
    pub(crate) in_flight: usize,
    pub(crate) batch_worker: Option<JoinHandle<()>>,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            message_tx,
            message_rx,
            epoch: 0,
            pending_select: None,
            in_flight: 0,
            batch_worker: None,
        }
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn sender(&self) -> Sender<JobMessage> {
        self.message_tx.clone()
    }

    /// Run `work` on a worker thread and deliver its message.
    pub(crate) fn spawn(&mut self, work: impl FnOnce() -> JobMessage + Send + 'static) {
        let tx = self.message_tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let _ = tx.send(work());
        });
    }

    /// Bookkeeping once a message from [`Self::spawn`] has been handled.
    pub(crate) fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.batch_worker.is_some()
    }

    /// True once the batch thread has exited; the handle is released.
    pub(crate) fn take_finished_batch_worker(&mut self) -> bool {
        if self
            .batch_worker
            .as_ref()
            .is_some_and(|handle| handle.is_finished())
        {
            if let Some(handle) = self.batch_worker.take() {
                let _ = handle.join();
            }
            return true;
        }
        false
    }
}
