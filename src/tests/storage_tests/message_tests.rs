// Message Tests - Testing ownership rules and previews

use crate::storage::message::format_duration;
use crate::storage::{Message, MessageKind};

#[test]
fn test_new_message_fields() {
    let msg = Message::new("me", "hello", MessageKind::Text);

    assert!(!msg.id.is_empty());
    assert_eq!(msg.sender_id.as_deref(), Some("me"));
    assert_eq!(msg.body, "hello");
    assert!(!msg.edited);
    assert!(msg.timestamp > 0);
}

#[test]
fn test_message_ids_are_unique() {
    let a = Message::new("me", "one", MessageKind::Text);
    let b = Message::new("me", "two", MessageKind::Text);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_system_message_has_no_sender() {
    let msg = Message::system("Alice joined");
    assert!(msg.is_system());
    assert!(msg.sender_id.is_none());

    let forced = Message::new("me", "annotation", MessageKind::System);
    assert!(forced.sender_id.is_none());
}

#[test]
fn test_only_sender_may_mutate() {
    let mine = Message::new("me", "hi", MessageKind::Text);
    assert!(mine.is_mutable_by("me"));
    assert!(!mine.is_mutable_by("alice"));

    let system = Message::system("Group created");
    assert!(!system.is_mutable_by("me"));
}

#[test]
fn test_apply_edit_marks_edited() {
    let mut msg = Message::new("me", "helo", MessageKind::Text);
    let (id, ts) = (msg.id.clone(), msg.timestamp);

    msg.apply_edit("hello");

    assert_eq!(msg.body, "hello");
    assert!(msg.edited);
    assert_eq!(msg.id, id);
    assert_eq!(msg.timestamp, ts);
}

#[test]
fn test_previews() {
    let text = Message::new("me", "abcdefghij", MessageKind::Text);
    assert_eq!(text.preview(60), "abcdefghij");
    assert_eq!(text.preview(4), "abcd…");

    let image = Message::new("me", "https://img.example/1.png", MessageKind::Image);
    assert_eq!(image.preview(60), "Photo");

    let audio = Message::new("me", "voice-note:1", MessageKind::Audio { duration_secs: 75 });
    assert_eq!(audio.preview(60), "Voice message (1:15)");
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(3), "0:03");
    assert_eq!(format_duration(600), "10:00");
}

#[test]
fn test_audio_kind_serialization() {
    let kind = MessageKind::Audio { duration_secs: 3 };
    let json = serde_json::to_string(&kind).expect("Failed to serialize");
    assert_eq!(json, r#"{"type":"audio","duration_secs":3}"#);

    let loaded: MessageKind = serde_json::from_str(&json).expect("Failed to deserialize");
    assert_eq!(loaded, kind);
}
