//! Control surface → projector replication through real sync channels.

use std::sync::Arc;
use std::time::Duration;

use lt_app::{ContentSequence, ProjectionStore, ProjectorReplica};
use lt_core::ports::ProjectionChannelPort;
use lt_core::{DisplaySettings, Frame, ProjectionState};
use lt_infra::{FileProjectionChannel, InMemoryProjectionChannel};

fn text_of(frame: &Frame) -> Option<(&str, Option<&str>)> {
    match frame {
        Frame::Text {
            content, reference, ..
        } => Some((content.as_str(), reference.as_deref())),
        _ => None,
    }
}

#[tokio::test]
async fn late_projector_sees_last_publish_without_further_changes() {
    let channel = Arc::new(InMemoryProjectionChannel::new());
    let (store, publisher) = ProjectionStore::new(channel.clone(), DisplaySettings::default(), 0);
    let worker = tokio::spawn(publisher.run());

    let sequence = Arc::new(ContentSequence::slides("Culto", "Bem-vindos\n\nOração\n\nLouvor"));
    sequence.project_at(&store, 0);
    store.advance();
    store.advance();

    // Dropping the store closes the queue, so the worker has published everything.
    drop(sequence);
    drop(store);
    worker.await.unwrap();

    let replica = ProjectorReplica::attach(channel).await.unwrap();
    assert_eq!(text_of(replica.frame()), Some(("Louvor", Some("Culto"))));
}

#[tokio::test]
async fn replica_follows_changes_in_order() {
    let channel = Arc::new(InMemoryProjectionChannel::new());
    let (store, publisher) = ProjectionStore::new(channel.clone(), DisplaySettings::default(), 0);
    let mut replica = ProjectorReplica::attach(channel.clone()).await.unwrap();
    tokio::spawn(publisher.run());

    store.set_projection(ProjectionState::text("No princípio criou Deus", "Gênesis 1:1"));
    store.toggle_blackout();
    store.toggle_blackout();

    let frame = replica.next_frame().await.unwrap().unwrap().clone();
    assert_eq!(
        text_of(&frame),
        Some(("No princípio criou Deus", Some("Gênesis 1:1")))
    );

    let rest = replica.next_frame().await.unwrap().unwrap().clone();
    assert!(matches!(rest, Frame::Rest { .. }));

    let restored = replica.next_frame().await.unwrap().unwrap().clone();
    assert_eq!(restored, frame);
}

#[tokio::test]
async fn hydration_racing_first_notification_is_idempotent() {
    let channel = Arc::new(InMemoryProjectionChannel::new());
    let (store, mut publisher) =
        ProjectionStore::new(channel.clone(), DisplaySettings::default(), 0);
    store.set_projection(ProjectionState::lyric("Castelo forte", "581. Castelo Forte"));

    // Notifications for the publishes already read by hydration arrive late.
    let mut rx = channel.subscribe();
    publisher.flush_pending().await;
    let mut replica = ProjectorReplica::attach(channel.clone()).await.unwrap();
    let hydrated = replica.frame().clone();

    while let Ok(snapshot) = rx.try_recv() {
        assert!(!replica.apply(snapshot));
    }
    assert_eq!(replica.frame(), &hydrated);
    assert_eq!(replica.applied_seq(), store.snapshot().seq);
}

#[tokio::test]
async fn lagging_replica_rehydrates_to_latest() {
    let channel = Arc::new(InMemoryProjectionChannel::new());
    let (store, mut publisher) =
        ProjectionStore::new(channel.clone(), DisplaySettings::default(), 0);
    let mut replica = ProjectorReplica::attach(channel.clone()).await.unwrap();

    for n in 0..200 {
        store.set_projection(ProjectionState::text(format!("slide {n}"), ""));
    }
    publisher.flush_pending().await;

    let frame = replica.next_frame().await.unwrap().unwrap();
    assert_eq!(text_of(frame), Some(("slide 199", None)));
}

#[tokio::test]
async fn projector_in_another_process_follows_the_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let control_side = Arc::new(FileProjectionChannel::new(dir.path()));
    let projector_side = Arc::new(FileProjectionChannel::new(dir.path()));
    let watcher = projector_side.spawn_watcher(Duration::from_millis(10));

    let (store, publisher) =
        ProjectionStore::new(control_side.clone(), DisplaySettings::default(), 0);
    tokio::spawn(publisher.run());
    store.set_projection(ProjectionState::text("Salmo 23", "Salmos 23:1"));

    let mut replica = ProjectorReplica::attach(projector_side).await.unwrap();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while text_of(replica.frame()).is_none() {
        tokio::time::timeout_at(deadline, replica.next_frame())
            .await
            .expect("projector never saw the publish")
            .unwrap();
    }
    assert_eq!(
        text_of(replica.frame()),
        Some(("Salmo 23", Some("Salmos 23:1")))
    );

    watcher.abort();
}

#[tokio::test]
async fn projector_follows_a_writer_restarted_without_its_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let projector_side = Arc::new(FileProjectionChannel::new(dir.path()));
    let watcher = projector_side.spawn_watcher(Duration::from_millis(10));

    let first_run = Arc::new(FileProjectionChannel::new(dir.path()));
    let (store, publisher) = ProjectionStore::new(first_run, DisplaySettings::default(), 40);
    let worker = tokio::spawn(publisher.run());
    store.set_projection(ProjectionState::text("Estrofe antiga", ""));
    drop(store);
    worker.await.unwrap();

    let mut replica = ProjectorReplica::attach(projector_side.clone()).await.unwrap();
    assert_eq!(replica.applied_seq(), 42);

    // The next run cannot resume the seq and starts again from zero.
    std::fs::remove_file(projector_side.snapshot_path()).unwrap();
    let second_run = Arc::new(FileProjectionChannel::new(dir.path()));
    let (store, publisher) = ProjectionStore::new(second_run, DisplaySettings::default(), 0);
    tokio::spawn(publisher.run());
    store.set_projection(ProjectionState::text("Nova estrofe", "Hino 2"));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while text_of(replica.frame()) != Some(("Nova estrofe", Some("Hino 2"))) {
        tokio::time::timeout_at(deadline, replica.next_frame())
            .await
            .expect("restarted writer was never followed")
            .unwrap();
    }
    assert_eq!(replica.applied_seq(), 2);

    watcher.abort();
}
