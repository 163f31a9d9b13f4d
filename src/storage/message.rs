//! Message structures and preview rendering

use serde::{Deserialize, Serialize};

/// What a message carries
///
/// Media kinds hold an opaque reference (URL or handle) in the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain text
    Text,
    /// Image reference
    Image,
    /// Voice note reference with its recorded length
    Audio {
        /// Recorded length in seconds
        duration_secs: u32,
    },
    /// Timeline annotation, not attributable to a sender
    System,
}

impl Default for MessageKind {
    fn default() -> Self {
        Self::Text
    }
}

impl MessageKind {
    /// Whether this is a system annotation
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}

/// Represents a stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: String,
    /// Sender user id (`None` for system messages)
    pub sender_id: Option<String>,
    /// Text, or a media reference for non-text kinds
    pub body: String,
    /// Message kind
    #[serde(default)]
    pub kind: MessageKind,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Whether the body was changed after sending
    #[serde(default)]
    pub edited: bool,
}

impl Message {
    /// Create a new message with a fresh id and the current time
    pub fn new(sender_id: impl Into<String>, body: impl Into<String>, kind: MessageKind) -> Self {
        let sender_id = if kind.is_system() {
            None
        } else {
            Some(sender_id.into())
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id,
            body: body.into(),
            kind,
            timestamp: chrono::Utc::now().timestamp_millis(),
            edited: false,
        }
    }

    /// Create a system annotation
    pub fn system(body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: None,
            body: body.into(),
            kind: MessageKind::System,
            timestamp: chrono::Utc::now().timestamp_millis(),
            edited: false,
        }
    }

    /// Whether this is a system annotation
    pub fn is_system(&self) -> bool {
        self.kind.is_system()
    }

    /// Whether `user_id` sent this message
    pub fn is_sent_by(&self, user_id: &str) -> bool {
        self.sender_id.as_deref() == Some(user_id)
    }

    /// Whether `user_id` may edit or delete this message
    pub fn is_mutable_by(&self, user_id: &str) -> bool {
        !self.is_system() && self.is_sent_by(user_id)
    }

    /// Replace the body and flag the message as edited
    pub fn apply_edit(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.edited = true;
    }

    /// Short text used for chat list previews
    pub fn preview(&self, max_chars: usize) -> String {
        match self.kind {
            MessageKind::Text | MessageKind::System => truncate(&self.body, max_chars),
            MessageKind::Image => "Photo".to_string(),
            MessageKind::Audio { duration_secs } => {
                format!("Voice message ({})", format_duration(duration_secs))
            }
        }
    }
}

/// Format a second count as `m:ss`
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
