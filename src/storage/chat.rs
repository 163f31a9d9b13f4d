//! Chat conversation management

use crate::storage::message::Message;
use serde::{Deserialize, Serialize};

/// What a chat is keyed by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ChatTarget {
    /// One-to-one chat with a counter-party user id
    User(String),
    /// Chat backed by a group id
    Group(String),
}

impl ChatTarget {
    /// The counter-party user id or group id
    pub fn key(&self) -> &str {
        match self {
            Self::User(id) | Self::Group(id) => id,
        }
    }

    /// Whether this is a group-backed chat
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

/// Represents a conversation
///
/// For group-backed chats `name` and `avatar` are a cached copy; the live
/// group is authoritative when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Chat id (the group id for group-backed chats)
    pub id: String,
    /// Counter-party or backing group
    pub target: ChatTarget,
    /// Display name cache
    pub name: String,
    /// Avatar reference cache
    #[serde(default)]
    pub avatar: Option<String>,
    /// Messages in chronological order
    pub messages: Vec<Message>,
    /// Number of unread messages
    #[serde(default)]
    pub unread_count: u32,
    /// Hidden from the default list
    #[serde(default)]
    pub archived: bool,
    /// End-to-end secret chat
    #[serde(default)]
    pub secret: bool,
    /// Notifications muted
    #[serde(default)]
    pub muted: bool,
    /// Counter-party presence hint
    #[serde(default)]
    pub online: bool,
    /// Counter-party is typing
    #[serde(default)]
    pub typing: bool,
    /// Preview of the last message
    #[serde(default)]
    pub last_message: Option<String>,
    /// Timestamp of the last message (Unix milliseconds)
    #[serde(default)]
    pub last_timestamp: Option<i64>,
}

impl Chat {
    /// Create a new, empty chat
    pub fn new(id: String, target: ChatTarget, name: String) -> Self {
        Self {
            id,
            target,
            name,
            avatar: None,
            messages: Vec::new(),
            unread_count: 0,
            archived: false,
            secret: false,
            muted: false,
            online: false,
            typing: false,
            last_message: None,
            last_timestamp: None,
        }
    }

    /// Create a chat backed by a group, keyed by the group id
    pub fn for_group(group_id: &str, name: String, avatar: Option<String>) -> Self {
        let mut chat = Self::new(
            group_id.to_string(),
            ChatTarget::Group(group_id.to_string()),
            name,
        );
        chat.avatar = avatar;
        chat
    }

    /// Create a direct chat with a fresh id
    pub fn for_user(user_id: &str, name: String) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            ChatTarget::User(user_id.to_string()),
            name,
        )
    }

    /// Whether the chat is backed by a group
    pub fn is_group(&self) -> bool {
        self.target.is_group()
    }

    /// Append a message and refresh the preview
    pub fn append_message(&mut self, msg: Message, preview_chars: usize) {
        self.messages.push(msg);
        self.refresh_preview(preview_chars);
    }

    /// Find a message by id
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    /// Find a message by id, mutably
    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == message_id)
    }

    /// Remove a message by id and refresh the preview
    pub fn remove_message(&mut self, message_id: &str, preview_chars: usize) -> Option<Message> {
        let idx = self.messages.iter().position(|m| m.id == message_id)?;
        let removed = self.messages.remove(idx);
        self.refresh_preview(preview_chars);
        Some(removed)
    }

    /// Drop every message and clear the preview
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.unread_count = 0;
        self.refresh_preview(0);
    }

    /// Recompute the preview from the tail of the message list
    pub fn refresh_preview(&mut self, preview_chars: usize) {
        match self.messages.last() {
            Some(last) => {
                self.last_message = Some(last.preview(preview_chars));
                self.last_timestamp = Some(last.timestamp);
            }
            None => {
                self.last_message = None;
                self.last_timestamp = None;
            }
        }
    }

    /// Mark chat as read
    pub fn mark_read(&mut self) {
        self.unread_count = 0;
    }

    /// Count one more unread message
    pub fn mark_unread(&mut self) {
        self.unread_count = self.unread_count.saturating_add(1);
    }
}
