mod support;

use std::sync::Arc;
use std::time::Duration;

use robolabel::api::ApiError;
use robolabel::batch::{BatchOutcome, BatchState, SelectionError};
use robolabel::config::DatasetSettings;
use robolabel::generation::GenerationKind;
use robolabel::session::{Session, SessionError};
use support::fake_backend::{FakeBackend, GENERATED_LABEL};

fn loaded_session(backend: &Arc<FakeBackend>) -> Session {
    let mut session = Session::new(backend.clone());
    session.batch_pause = Duration::ZERO;
    session
        .load_dataset(&DatasetSettings::default().load_request())
        .expect("load dataset");
    session
}

#[test]
fn batch_reloads_every_processed_episode() {
    let backend = FakeBackend::with_episodes(4);
    backend.store(0, &[("pick", 0.0, 1.0)]);
    backend.store(2, &[("zzz_place", 0.0, 1.0)]);
    let mut session = loaded_session(&backend);
    session.prefetch_all();
    session.select_episode(1).expect("select");

    let summary = session
        .run_batch_blocking(GenerationKind::Subtasks, "0-2")
        .expect("batch");

    assert_eq!(summary.outcome, BatchOutcome::Completed);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(backend.generated(), vec![0, 1, 2]);
    for episode in 0..3 {
        let local = session.corpus().episode(episode).expect("local copy");
        assert_eq!(local, &backend.stored(episode));
    }
    assert!(session.corpus().contains(3));
    let labels: Vec<&str> = session.label_index().labels().collect();
    assert_eq!(labels, vec![GENERATED_LABEL, "pick", "zzz_place"]);
    assert_eq!(session.batch().state(), BatchState::Idle);
}

#[test]
fn failing_item_does_not_stop_the_batch() {
    let backend = FakeBackend::with_episodes(3);
    backend.fail_generation_for(1);
    let mut session = loaded_session(&backend);

    let summary = session
        .run_batch_blocking(GenerationKind::FakeVqa, "")
        .expect("batch");

    assert_eq!(backend.generated(), vec![0, 1, 2]);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].episode, 1);
    assert!(session.batch().is_idle());
}

#[test]
fn window_longer_than_stride_sends_nothing() {
    let backend = FakeBackend::with_episodes(3);
    let mut session = loaded_session(&backend);
    session.params.fake_vqa.stride_s = 2.0;
    session.params.fake_vqa.window_s = 5.0;

    let result = session.run_batch_blocking(GenerationKind::FakeVqa, "0-2");

    assert!(matches!(
        result,
        Err(SessionError::Api(ApiError::InvalidRequest(_)))
    ));
    assert!(backend.generated().is_empty());
    assert!(session.batch().is_idle());
}

#[test]
fn malformed_selection_is_rejected_before_start() {
    let backend = FakeBackend::with_episodes(5);
    let mut session = loaded_session(&backend);

    let reversed = session.start_batch(GenerationKind::Subtasks, "4-2");
    assert!(matches!(
        reversed,
        Err(SessionError::Selection(SelectionError::Reversed { start: 4, end: 2 }))
    ));
    let unknown = session.start_batch(GenerationKind::Subtasks, "3, 8");
    assert!(matches!(
        unknown,
        Err(SessionError::Selection(SelectionError::Unknown(8)))
    ));
    assert!(session.batch().is_idle());
}

#[test]
fn second_batch_is_refused_while_one_runs() {
    let backend = FakeBackend::with_episodes(2);
    let mut session = loaded_session(&backend);

    let job = session
        .start_batch(GenerationKind::Subtasks, "0-1")
        .expect("start");
    assert_eq!(job.plan.episodes(), &[0, 1]);
    assert!(matches!(
        session.start_batch(GenerationKind::FakeVqa, ""),
        Err(SessionError::BatchBusy)
    ));

    assert!(session.cancel_batch());
    assert_eq!(
        session.batch().state(),
        BatchState::Canceling(GenerationKind::Subtasks)
    );
    assert!(job.cancel.load(std::sync::atomic::Ordering::Acquire));
}
