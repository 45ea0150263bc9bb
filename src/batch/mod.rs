//! Sequential, cancelable AI generation across many episodes.
//!
//! [`run_batch`] does the work on whichever thread calls it and reports
//! progress through [`BatchEvent`]s. [`BatchControl`] is the UI-side state
//! machine that decides whether a run may start and which episode is
//! currently being regenerated.

mod control;
mod runner;
mod selection;

pub use control::{BatchControl, BatchState};
pub use runner::{BatchPlan, run_batch};
pub use selection::{SelectionError, parse_episode_selection};

use crate::annotations::EpisodeIndex;
use crate::generation::GenerationKind;

/// How a batch run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    Completed,
    Canceled,
}

impl BatchOutcome {
    pub fn status_text(self) -> &'static str {
        match self {
            Self::Completed => "Done.",
            Self::Canceled => "Canceled.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchFailure {
    pub episode: EpisodeIndex,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchSummary {
    pub kind: GenerationKind,
    pub outcome: BatchOutcome,
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

/// Progress notifications, emitted in order from the running batch.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchEvent {
    ItemStarted {
        kind: GenerationKind,
        /// One-based position within the run.
        position: usize,
        total: usize,
        episode: EpisodeIndex,
    },
    ItemSucceeded {
        episode: EpisodeIndex,
        count: usize,
    },
    ItemFailed(BatchFailure),
    Finished(BatchSummary),
}

impl BatchEvent {
    /// One-line status for the status bar, if this event changes it.
    pub fn status_text(&self) -> Option<String> {
        match self {
            Self::ItemStarted {
                kind,
                position,
                total,
                episode,
            } => Some(format!(
                "{} {position}/{total} Episode {episode} ...",
                kind.label()
            )),
            Self::Finished(summary) => Some(summary.outcome.status_text().to_string()),
            Self::ItemSucceeded { .. } | Self::ItemFailed(_) => None,
        }
    }

    /// Entry for the batch log panel.
    pub fn log_line(&self) -> String {
        match self {
            Self::ItemStarted { .. } => self.status_text().unwrap_or_default(),
            Self::ItemSucceeded { episode, count } => {
                format!("Episode {episode}: {count} segments")
            }
            Self::ItemFailed(failure) => {
                format!("Episode {}: failed: {}", failure.episode, failure.message)
            }
            Self::Finished(summary) => {
                let mut line = format!(
                    "{} {}/{} succeeded",
                    summary.outcome.status_text(),
                    summary.succeeded,
                    summary.total
                );
                if !summary.failures.is_empty() {
                    let episodes: Vec<String> = summary
                        .failures
                        .iter()
                        .map(|failure| failure.episode.to_string())
                        .collect();
                    line.push_str(&format!(", failed: {}", episodes.join(", ")));
                }
                line
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_status_names_kind_position_and_episode() {
        let event = BatchEvent::ItemStarted {
            kind: GenerationKind::FakeVqa,
            position: 2,
            total: 5,
            episode: 11,
        };
        assert_eq!(
            event.status_text().as_deref(),
            Some("fake_vqa 2/5 Episode 11 ...")
        );
    }

    #[test]
    fn finished_log_lists_failed_episodes() {
        let event = BatchEvent::Finished(BatchSummary {
            kind: GenerationKind::Subtasks,
            outcome: BatchOutcome::Completed,
            total: 3,
            succeeded: 2,
            failures: vec![BatchFailure {
                episode: 1,
                message: "boom".into(),
            }],
        });
        assert_eq!(event.status_text().as_deref(), Some("Done."));
        assert_eq!(event.log_line(), "Done. 2/3 succeeded, failed: 1");
    }
}
