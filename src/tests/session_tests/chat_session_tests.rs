// Chat Session Tests - Testing the per-chat session wiring

use super::advance_ms;
use crate::session::{CallMedium, CallPhase, ChatSession};
use crate::storage::{GroupDraft, MessageKind};
use crate::tests::helpers::{other_user, stores, viewer};

#[tokio::test]
async fn test_open_sets_active_chat() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    store.receive(&chat.id, "alice", "hi", MessageKind::Text).await;

    let session = ChatSession::open(&store, &chat.id).await.expect("Chat exists");

    assert_eq!(session.chat_id(), chat.id);
    assert_eq!(store.active_chat_id().await, Some(chat.id.clone()));
    assert_eq!(store.chat(&chat.id).await.unwrap().unread_count, 0);
    assert!(ChatSession::open(&store, "missing").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_recording_suspends_input() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();
    assert!(session.input_enabled(&store).await);

    assert!(session.start_recording(&store).await);
    assert!(!session.input_enabled(&store).await);

    session.compose.set_draft("typed meanwhile");
    assert!(session.submit(&store).await.unwrap().is_none());
    assert_eq!(session.compose.draft(), "typed meanwhile");

    advance_ms(2_500).await;
    let clip = session.stop_recording(&store, true).await.unwrap().expect("Clip sent");
    assert_eq!(clip.kind, MessageKind::Audio { duration_secs: 2 });
    assert!(session.input_enabled(&store).await);

    let chat = store.chat(&chat.id).await.unwrap();
    assert_eq!(chat.messages.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_recording_cancels_edit() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();
    session.compose.set_draft("original");
    let sent = session.submit(&store).await.unwrap().unwrap();

    assert!(session.begin_edit(&store, &sent.id).await);
    assert!(session.start_recording(&store).await);

    assert!(!session.compose.is_editing());
    assert!(session.stop_recording(&store, false).await.unwrap().is_none());
}

#[tokio::test]
async fn test_begin_edit_only_own_messages() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let theirs = store.receive(&chat.id, "alice", "hello", MessageKind::Text).await.unwrap();
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();

    assert!(!session.begin_edit(&store, &theirs.id).await);
    assert!(!session.begin_edit(&store, "missing").await);

    session.compose.set_draft("mine");
    let mine = session.submit(&store).await.unwrap().unwrap();
    assert!(session.begin_edit(&store, &mine.id).await);
    session.compose.set_draft("mine, edited");
    let edited = session.submit(&store).await.unwrap().unwrap();

    assert!(edited.edited);
    assert_eq!(store.chat(&chat.id).await.unwrap().last_message.as_deref(), Some("mine, edited"));
}

#[tokio::test]
async fn test_non_member_cannot_compose() {
    let (registry, store) = stores();
    let group = registry.create(GroupDraft::new().name("Theirs"), Some(&other_user())).await.unwrap();
    let chat = store.open_for_group(&group).await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();

    assert!(!session.can_compose(&store).await);
    assert!(!session.input_enabled(&store).await);
    assert!(!session.start_recording(&store).await);

    registry.join(&group.id, Some(&viewer())).await;
    assert!(session.can_compose(&store).await);
}

#[tokio::test(start_paused = true)]
async fn test_call_from_session() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();

    assert!(session.start_call(CallMedium::Audio).await);
    advance_ms(3_500).await;
    assert_eq!(session.call().phase().await, CallPhase::Connected);
    assert_eq!(session.call().elapsed_secs().await, 1);

    assert!(session.end_call().await);
    assert!(!session.call().has_pending_timers());
    assert_eq!(session.call().phase().await, CallPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_close_discards_and_clears_active() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();
    session.start_recording(&store).await;
    session.start_call(CallMedium::Video).await;
    advance_ms(2_500).await;

    session.close(&store).await;
    advance_ms(5_000).await;

    assert!(store.active_chat_id().await.is_none());
    assert!(store.chat(&chat.id).await.unwrap().messages.is_empty());
}

#[tokio::test]
async fn test_close_keeps_other_active_chat() {
    let (_, store) = stores();
    let a = store.open_for_user("alice").await;
    let b = store.open_for_user("bob").await;
    let session = ChatSession::open(&store, &a.id).await.unwrap();
    store.set_active(Some(&b.id)).await;

    session.close(&store).await;

    assert_eq!(store.active_chat_id().await, Some(b.id));
}

#[tokio::test(start_paused = true)]
async fn test_begin_edit_refused_while_recording() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();
    session.compose.set_draft("hi");
    let sent = session.submit(&store).await.unwrap().unwrap();

    assert!(session.start_recording(&store).await);
    assert!(!session.begin_edit(&store, &sent.id).await);
    assert!(!session.compose.is_editing());
    assert!(session.recording().is_recording().await);

    session.stop_recording(&store, false).await.unwrap();
    assert!(session.begin_edit(&store, &sent.id).await);
}

#[tokio::test(start_paused = true)]
async fn test_close_discards_recording_in_left_group() {
    let (registry, store) = stores();
    let me = viewer();
    let group = registry.create(GroupDraft::new().name("Short stay"), Some(&me)).await.unwrap();
    let chat = store.open_for_group(&group).await;
    let mut session = ChatSession::open(&store, &chat.id).await.unwrap();
    assert!(session.start_recording(&store).await);
    advance_ms(1_500).await;
    registry.leave(&group.id, Some(&me)).await;

    session.close(&store).await;

    assert!(store.chat(&chat.id).await.unwrap().messages.is_empty());
    assert!(store.active_chat_id().await.is_none());
}
