// Compose Tests - Testing draft handling and edit mode

use crate::session::{ComposeMode, ComposeState, Submission};
use crate::storage::{ChatTarget, GroupDraft, Message, MessageKind};
use crate::tests::helpers::{stores, viewer};
use crate::Error;

#[test]
fn test_draft_editing() {
    let mut compose = ComposeState::new();
    compose.add_char('h');
    compose.add_char('i');
    compose.add_char('!');
    compose.backspace();

    assert_eq!(compose.draft(), "hi");
    assert_eq!(compose.mode(), &ComposeMode::Composing);
}

#[test]
fn test_blank_submission_leaves_state() {
    let mut compose = ComposeState::new();
    compose.set_draft("   \n ");

    assert!(compose.take_submission().is_none());
    assert_eq!(compose.draft(), "   \n ");
}

#[test]
fn test_send_submission_trims_and_clears() {
    let mut compose = ComposeState::new();
    compose.set_draft("  hello  ");

    let submission = compose.take_submission();

    assert_eq!(submission, Some(Submission::Send { body: "hello".to_string() }));
    assert_eq!(compose.draft(), "");
}

#[test]
fn test_edit_mode_round() {
    let mut compose = ComposeState::new();
    let message = Message::new("me", "draft text", MessageKind::Text);

    assert!(compose.begin_edit(&message, "me"));
    assert!(compose.is_editing());
    assert_eq!(compose.draft(), "draft text");

    compose.set_draft("final text");
    let submission = compose.take_submission();

    assert_eq!(
        submission,
        Some(Submission::Edit {
            message_id: message.id.clone(),
            body: "final text".to_string(),
        })
    );
    assert!(!compose.is_editing());
    assert_eq!(compose.draft(), "");
}

#[test]
fn test_begin_edit_requires_ownership() {
    let mut compose = ComposeState::new();
    let theirs = Message::new("alice", "not yours", MessageKind::Text);
    let notice = Message::system("Alice joined");

    assert!(!compose.begin_edit(&theirs, "me"));
    assert!(!compose.begin_edit(&notice, "me"));
    assert!(!compose.is_editing());
}

#[test]
fn test_cancel_edit() {
    let mut compose = ComposeState::new();
    let message = Message::new("me", "original", MessageKind::Text);
    compose.begin_edit(&message, "me");

    compose.cancel_edit();

    assert_eq!(compose.mode(), &ComposeMode::Composing);
    assert_eq!(compose.draft(), "");
}

#[tokio::test]
async fn test_submit_sends_and_edits() {
    let (_, store) = stores();
    let chat = store.open_for_user("alice").await;
    let mut compose = ComposeState::new();

    compose.set_draft("helo");
    let sent = compose.submit(&store, &chat).await.unwrap().expect("Should send");
    assert_eq!(sent.body, "helo");

    assert!(compose.begin_edit(&sent, &store.viewer().id));
    compose.set_draft("hello");
    let edited = compose.submit(&store, &chat).await.unwrap().expect("Should edit");

    assert_eq!(edited.id, sent.id);
    let chat = store.chat(&chat.id).await.unwrap();
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].body, "hello");
}

#[tokio::test]
async fn test_submit_failure_restores_draft() {
    let (registry, store) = stores();
    let me = viewer();
    let group = registry.create(GroupDraft::new(), Some(&me)).await.unwrap();
    let chat = store.open_for_group(&group).await;
    registry.leave(&group.id, Some(&me)).await;

    let mut compose = ComposeState::new();
    compose.set_draft("anyone?");
    let result = compose.submit(&store, &chat).await;

    assert!(matches!(result, Err(Error::NotMember(_))));
    assert_eq!(compose.draft(), "anyone?");
    assert!(store.chat_for(&ChatTarget::Group(group.id)).await.unwrap().messages.is_empty());
}
