mod support;

use std::sync::Arc;

use robolabel::annotations::{QaDraft, SubtaskDraft, SubtaskSegment};
use robolabel::api::ImportKind;
use robolabel::batch::{BatchEvent, BatchState};
use robolabel::config::DatasetSettings;
use robolabel::generation::GenerationKind;
use robolabel::session::{BatchFollowUp, Session, SessionError};
use support::fake_backend::FakeBackend;

fn loaded_session(backend: &Arc<FakeBackend>) -> Session {
    let mut session = Session::new(backend.clone());
    session
        .load_dataset(&DatasetSettings::default().load_request())
        .expect("load dataset");
    session
}

fn draft(label: &str, start: &str, end: &str) -> SubtaskDraft {
    SubtaskDraft {
        label: label.into(),
        start: start.into(),
        end: end.into(),
    }
}

#[test]
fn selecting_an_episode_loads_its_annotations_and_duration() {
    let backend = FakeBackend::with_episodes(3);
    backend.store(1, &[("pick", 0.0, 1.5)]);
    let mut session = loaded_session(&backend);

    session.select_episode(1).expect("select");

    assert_eq!(session.active_episode(), Some(1));
    assert_eq!(session.video_key(), Some("observation.images.top"));
    let annotations = session.active_annotations().expect("active set");
    assert_eq!(annotations.subtasks[0].label, "pick");
    assert_eq!(session.playback().duration(), Some(10.0));
    assert_eq!(backend.fetches(), vec![1]);
}

#[test]
fn operations_without_a_dataset_are_refused() {
    let backend = FakeBackend::with_episodes(2);
    let mut session = Session::new(backend.clone());

    assert!(matches!(session.select_episode(0), Err(SessionError::NoDataset)));
    assert!(matches!(
        session.add_subtask(&draft("pick", "0", "1")),
        Err(SessionError::NoDataset)
    ));
    assert!(backend.fetches().is_empty());
}

#[test]
fn unknown_episode_cannot_be_selected() {
    let backend = FakeBackend::with_episodes(2);
    let mut session = loaded_session(&backend);

    assert!(matches!(
        session.select_episode(9),
        Err(SessionError::UnknownEpisode(9))
    ));
    assert_eq!(session.active_episode(), None);
}

#[test]
fn invalid_drafts_are_dropped_quietly() {
    let backend = FakeBackend::with_episodes(1);
    let mut session = loaded_session(&backend);
    session.select_episode(0).expect("select");

    assert!(!session.add_subtask(&draft("", "0", "1")).expect("add"));
    assert!(!session.add_subtask(&draft("pick", "2", "1")).expect("add"));
    assert!(!session.add_subtask(&draft("pick", "abc", "1")).expect("add"));
    let qa = QaDraft {
        frame_idx: "12".into(),
        kind: "count".into(),
        question: "How many cups?".into(),
        answer: String::new(),
    };
    assert!(!session.add_qa_label(&qa).expect("add"));

    assert!(session.active_annotations().expect("active").is_empty());
}

#[test]
fn save_persists_local_edits_and_reset_discards_them() {
    let backend = FakeBackend::with_episodes(2);
    let mut session = loaded_session(&backend);
    session.select_episode(0).expect("select");

    assert!(session.add_subtask(&draft("pick", "0", "1.5")).expect("add"));
    session.save_active().expect("save");
    assert_eq!(backend.saves(), vec![0]);
    assert_eq!(backend.stored(0).subtasks.len(), 1);

    assert!(session.add_subtask(&draft("place", "1.5", "3")).expect("add"));
    assert_eq!(session.active_annotations().expect("active").subtasks.len(), 2);
    session.reset_active().expect("reset");

    let subtasks = &session.active_annotations().expect("active").subtasks;
    assert_eq!(subtasks.len(), 1);
    assert_eq!(subtasks[0].label, "pick");
}

#[test]
fn label_indices_cover_every_known_episode() {
    let backend = FakeBackend::with_episodes(3);
    backend.store(0, &[("pick", 0.0, 1.0)]);
    backend.store(1, &[("place", 0.0, 1.0), ("approach", 1.0, 2.0)]);
    backend.store(2, &[("pick", 0.0, 1.0), ("", 1.0, 2.0)]);
    let mut session = loaded_session(&backend);
    session.select_episode(0).expect("select");
    assert_eq!(session.label_index().get("pick"), Some(0));

    assert_eq!(session.prefetch_all(), 2);

    let index = session.label_index();
    assert_eq!(index.get("approach"), Some(0));
    assert_eq!(index.get("pick"), Some(1));
    assert_eq!(index.get("place"), Some(2));
    assert_eq!(index.display_index(""), "?");
    assert_eq!(index.len(), 3);
}

#[test]
fn renaming_a_label_renumbers_the_timeline() {
    let backend = FakeBackend::with_episodes(1);
    backend.store(0, &[("pick", 0.0, 2.0), ("place", 2.0, 4.0)]);
    let mut session = loaded_session(&backend);
    session.select_episode(0).expect("select");

    let renamed = SubtaskSegment {
        start: 2.0,
        end: 4.0,
        label: "lift".into(),
    };
    assert!(session.update_subtask(1, &renamed).expect("update"));

    let blocks = session.timeline().expect("timeline");
    let indices: Vec<Option<usize>> = blocks.iter().map(|block| block.color_index).collect();
    assert_eq!(indices, vec![Some(1), Some(0)]);
}

#[test]
fn prefetch_never_overwrites_local_edits() {
    let backend = FakeBackend::with_episodes(2);
    backend.store(0, &[("pick", 0.0, 1.0)]);
    let mut session = loaded_session(&backend);
    session.select_episode(0).expect("select");
    assert!(session.add_subtask(&draft("zeta", "1", "2")).expect("add"));

    session.prefetch_all();

    let labels: Vec<&str> = session
        .active_annotations()
        .expect("active")
        .subtasks
        .iter()
        .map(|segment| segment.label.as_str())
        .collect();
    assert_eq!(labels, vec!["pick", "zeta"]);
    assert_eq!(backend.fetches(), vec![0, 1]);
}

#[test]
fn current_frame_follows_dataset_rate() {
    let backend = FakeBackend::with_episodes(1);
    let mut session = loaded_session(&backend);
    session.select_episode(0).expect("select");

    session.playback_mut().seek(1.234);

    assert_eq!(session.current_frame(), 37);
    session.stamp_qa_frame();
    assert_eq!(session.drafts.qa.frame_idx, "37");
}

#[test]
fn episode_in_flight_refuses_edits_until_its_item_settles() {
    let backend = FakeBackend::with_episodes(2);
    let mut session = loaded_session(&backend);
    session.select_episode(1).expect("select");
    session
        .start_batch(GenerationKind::Subtasks, "1")
        .expect("start batch");

    session.handle_batch_event(&BatchEvent::ItemStarted {
        kind: GenerationKind::Subtasks,
        position: 1,
        total: 1,
        episode: 1,
    });
    assert!(matches!(
        session.add_subtask(&draft("pick", "0", "1")),
        Err(SessionError::EpisodeLocked(1))
    ));
    assert!(matches!(
        session.save_active(),
        Err(SessionError::EpisodeLocked(1))
    ));

    let follow_up = session.handle_batch_event(&BatchEvent::ItemSucceeded {
        episode: 1,
        count: 1,
    });
    assert_eq!(follow_up, BatchFollowUp::Reload(1));
    assert!(session.add_subtask(&draft("pick", "0", "1")).expect("add"));
    assert_eq!(
        session.batch().state(),
        BatchState::Running(GenerationKind::Subtasks)
    );
}

#[test]
fn import_rereads_every_known_episode() {
    let backend = FakeBackend::with_episodes(3);
    backend.store(0, &[("pick", 0.0, 1.0)]);
    let mut session = loaded_session(&backend);
    session.prefetch_all();
    session.select_episode(0).expect("select");
    backend.store(2, &[("stack", 0.0, 1.0)]);

    session
        .import_from_root(ImportKind::Subtasks, "/data/labels")
        .expect("import");

    assert_eq!(session.corpus().episode(2), Some(&backend.stored(2)));
    assert_eq!(session.label_index().get("stack"), Some(1));
    assert_eq!(session.corpus().len(), 3);
}
