use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{info, warn};

use super::{BatchEvent, BatchFailure, BatchOutcome, BatchSummary};
use crate::annotations::EpisodeIndex;
use crate::api::{ApiError, Generator};
use crate::generation::{GenerationKind, GenerationOptions, GenerationParams};

/// A validated batch: every item's request is known to be well formed.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchPlan {
    kind: GenerationKind,
    episodes: Vec<EpisodeIndex>,
    params: GenerationParams,
    pause: Duration,
}

impl BatchPlan {
    /// Rejects inconsistent parameters before anything is sent.
    pub fn new(
        kind: GenerationKind,
        episodes: Vec<EpisodeIndex>,
        params: GenerationParams,
        pause: Duration,
    ) -> Result<Self, ApiError> {
        params.validate(kind)?;
        Ok(Self {
            kind,
            episodes,
            params,
            pause,
        })
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    pub fn episodes(&self) -> &[EpisodeIndex] {
        &self.episodes
    }
}

/// Run every item of `plan` in order, one request at a time.
///
/// `cancel` is polled right before each item is sent, after any pause; an
/// item already sent always settles.
/// A failing item is reported and skipped.
pub fn run_batch<G: Generator + ?Sized>(
    generator: &G,
    plan: &BatchPlan,
    cancel: &AtomicBool,
    mut on_event: impl FnMut(BatchEvent),
) -> BatchSummary {
    let total = plan.episodes.len();
    let mut succeeded = 0;
    let mut failures = Vec::new();
    let mut outcome = BatchOutcome::Completed;
    info!(kind = plan.kind.label(), total, "batch started");

    for (offset, &episode) in plan.episodes.iter().enumerate() {
        if offset > 0 && !plan.pause.is_zero() {
            std::thread::sleep(plan.pause);
        }
        if cancel.load(Ordering::Acquire) {
            outcome = BatchOutcome::Canceled;
            break;
        }
        on_event(BatchEvent::ItemStarted {
            kind: plan.kind,
            position: offset + 1,
            total,
            episode,
        });
        let result = plan
            .params
            .request(plan.kind, episode, GenerationOptions::BATCH)
            .and_then(|request| generator.generate(&request));
        match result {
            Ok(result) => {
                succeeded += 1;
                info!(episode, count = result.count, "batch item done");
                on_event(BatchEvent::ItemSucceeded {
                    episode,
                    count: result.count,
                });
            }
            Err(err) => {
                warn!(episode, error = %err, "batch item failed");
                let failure = BatchFailure {
                    episode,
                    message: err.to_string(),
                };
                failures.push(failure.clone());
                on_event(BatchEvent::ItemFailed(failure));
            }
        }
    }

    let summary = BatchSummary {
        kind: plan.kind,
        outcome,
        total,
        succeeded,
        failures,
    };
    info!(
        outcome = summary.outcome.status_text(),
        succeeded,
        failed = summary.failures.len(),
        "batch finished"
    );
    on_event(BatchEvent::Finished(summary.clone()));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenerationRequest, GenerationResult};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct ScriptedGenerator {
        calls: Mutex<Vec<EpisodeIndex>>,
        fail_on: Option<EpisodeIndex>,
        cancel_on: Option<(EpisodeIndex, &'static AtomicBool)>,
    }

    impl Generator for ScriptedGenerator {
        fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ApiError> {
            let episode = request.episode_index();
            self.calls.lock().unwrap().push(episode);
            if let Some((target, flag)) = self.cancel_on {
                if target == episode {
                    flag.store(true, Ordering::Release);
                }
            }
            if self.fail_on == Some(episode) {
                return Err(ApiError::Server {
                    status: 500,
                    detail: "model offline".into(),
                });
            }
            Ok(GenerationResult {
                episode_index: Some(episode),
                count: 3,
            })
        }
    }

    fn plan(kind: GenerationKind, episodes: &[EpisodeIndex]) -> BatchPlan {
        BatchPlan::new(
            kind,
            episodes.to_vec(),
            GenerationParams::default(),
            Duration::ZERO,
        )
        .unwrap()
    }

    #[test]
    fn cancel_during_second_item_skips_the_rest() {
        static CANCEL: AtomicBool = AtomicBool::new(false);
        let generator = ScriptedGenerator {
            cancel_on: Some((1, &CANCEL)),
            ..Default::default()
        };
        let mut events = Vec::new();
        let summary = run_batch(
            &generator,
            &plan(GenerationKind::Subtasks, &[0, 1, 2, 3]),
            &CANCEL,
            |event| events.push(event),
        );
        assert_eq!(*generator.calls.lock().unwrap(), vec![0, 1]);
        assert_eq!(summary.outcome, BatchOutcome::Canceled);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(
            events.last().and_then(BatchEvent::status_text).as_deref(),
            Some("Canceled.")
        );
    }

    #[test]
    fn cancel_during_pause_stops_before_next_item() {
        let generator = ScriptedGenerator::default();
        let cancel = Arc::new(AtomicBool::new(false));
        let plan = BatchPlan::new(
            GenerationKind::Subtasks,
            vec![0, 1, 2, 3],
            GenerationParams::default(),
            Duration::from_millis(200),
        )
        .unwrap();
        let mut canceler = None;
        let summary = run_batch(&generator, &plan, &cancel, |event| {
            if let BatchEvent::ItemSucceeded { episode: 1, .. } = event {
                let flag = Arc::clone(&cancel);
                canceler = Some(std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(20));
                    flag.store(true, Ordering::Release);
                }));
            }
        });
        if let Some(handle) = canceler {
            handle.join().unwrap();
        }
        assert_eq!(*generator.calls.lock().unwrap(), vec![0, 1]);
        assert_eq!(summary.outcome, BatchOutcome::Canceled);
        assert_eq!(summary.succeeded, 2);
    }

    #[test]
    fn failed_item_does_not_abort_the_run() {
        let generator = ScriptedGenerator {
            fail_on: Some(1),
            ..Default::default()
        };
        let cancel = AtomicBool::new(false);
        let mut events = Vec::new();
        let summary = run_batch(
            &generator,
            &plan(GenerationKind::FakeVqa, &[0, 1, 2]),
            &cancel,
            |event| events.push(event),
        );
        assert_eq!(*generator.calls.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(summary.outcome, BatchOutcome::Completed);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(
            summary.failures,
            vec![BatchFailure {
                episode: 1,
                message: "model offline".into()
            }]
        );
        let statuses: Vec<String> = events.iter().filter_map(BatchEvent::status_text).collect();
        assert_eq!(
            statuses,
            vec![
                "fake_vqa 1/3 Episode 0 ...",
                "fake_vqa 2/3 Episode 1 ...",
                "fake_vqa 3/3 Episode 2 ...",
                "Done."
            ]
        );
    }

    #[test]
    fn cancel_before_start_sends_nothing() {
        let generator = ScriptedGenerator::default();
        let cancel = AtomicBool::new(true);
        let summary = run_batch(
            &generator,
            &plan(GenerationKind::Subtasks, &[4, 5]),
            &cancel,
            |_| {},
        );
        assert!(generator.calls.lock().unwrap().is_empty());
        assert_eq!(summary.outcome, BatchOutcome::Canceled);
    }

    #[test]
    fn inconsistent_window_is_rejected_before_any_call() {
        let mut params = GenerationParams::default();
        params.fake_vqa.window_s = 5.0;
        params.fake_vqa.stride_s = 3.0;
        let err = BatchPlan::new(GenerationKind::FakeVqa, vec![0, 1], params, Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
