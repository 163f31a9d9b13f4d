// Recording Tests - Testing voice-note capture, commit and discard

use super::advance_ms;
use crate::session::{RecordingPhase, RecordingSession, RecordingState};
use crate::storage::{ChatTarget, GroupDraft, MessageKind, Settings};
use crate::tests::helpers::{other_user, stores};
use crate::Error;

fn alice() -> ChatTarget {
    ChatTarget::User("alice".to_string())
}

#[test]
fn test_recording_state_transitions() {
    let mut state = RecordingState::default();
    assert!(!state.tick());
    assert_eq!(state.stop(), None);

    assert!(state.start());
    assert!(!state.start());
    state.tick();
    state.tick();

    assert_eq!(state.stop(), Some(2));
    assert_eq!(state.phase, RecordingPhase::Idle);
    assert_eq!(state.elapsed_secs, 0);
}

#[tokio::test(start_paused = true)]
async fn test_commit_sends_one_audio_message() {
    let (_, store) = stores();
    let mut recording = RecordingSession::new(&Settings::default());

    assert!(recording.start().await);
    assert!(recording.is_recording().await);
    advance_ms(3_500).await;
    assert_eq!(recording.elapsed_secs().await, 3);

    let message = recording
        .stop(true, &store, &alice())
        .await
        .expect("Commit should succeed")
        .expect("Clip should be sent");

    assert_eq!(message.kind, MessageKind::Audio { duration_secs: 3 });
    assert!(message.body.starts_with("voice-note:"));
    assert_eq!(recording.phase().await, RecordingPhase::Idle);
    assert!(!recording.has_pending_timers());

    let chat = store.chat_for(&alice()).await.unwrap();
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.last_message.as_deref(), Some("Voice message (0:03)"));
}

#[tokio::test(start_paused = true)]
async fn test_discard_sends_nothing() {
    let (_, store) = stores();
    let mut recording = RecordingSession::new(&Settings::default());
    recording.start().await;
    advance_ms(2_500).await;

    let result = recording.stop(false, &store, &alice()).await.unwrap();

    assert!(result.is_none());
    assert!(store.chats().await.is_empty());
    assert!(!recording.has_pending_timers());
    assert_eq!(recording.elapsed_secs().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_when_idle_is_noop() {
    let (_, store) = stores();
    let mut recording = RecordingSession::new(&Settings::default());

    assert!(recording.stop(true, &store, &alice()).await.unwrap().is_none());
    assert!(store.chats().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_counter_stops_after_stop() {
    let (_, store) = stores();
    let mut recording = RecordingSession::new(&Settings::default());
    recording.start().await;
    advance_ms(1_500).await;
    recording.stop(false, &store, &alice()).await.unwrap();

    advance_ms(5_000).await;
    assert_eq!(recording.elapsed_secs().await, 0);
    assert!(!recording.is_recording().await);
}

#[tokio::test(start_paused = true)]
async fn test_commit_to_foreign_group_fails() {
    let (registry, store) = stores();
    let group = registry.create(GroupDraft::new(), Some(&other_user())).await.unwrap();
    let target = ChatTarget::Group(group.id);
    let mut recording = RecordingSession::new(&Settings::default());
    recording.start().await;
    advance_ms(1_500).await;

    let result = recording.stop(true, &store, &target).await;

    assert!(matches!(result, Err(Error::NotMember(_))));
    assert!(!recording.is_recording().await);
}
