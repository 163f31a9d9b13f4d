//! Compose and edit mode for the message input

use crate::conversations::ConversationStore;
use crate::storage::{Chat, Message, MessageKind};
use crate::Result;

/// What the input is currently doing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// Writing a new message
    #[default]
    Composing,
    /// Rewriting an existing message
    Editing {
        /// Id of the message being edited
        message_id: String,
    },
}

/// What submitting the draft should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Append a new text message
    Send {
        /// Message text
        body: String,
    },
    /// Replace the body of an existing message
    Edit {
        /// Target message id
        message_id: String,
        /// New text
        body: String,
    },
}

/// Draft buffer plus mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    mode: ComposeMode,
    draft: String,
}

impl ComposeState {
    /// Create an empty composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode
    pub fn mode(&self) -> &ComposeMode {
        &self.mode
    }

    /// Current draft text
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether an existing message is being edited
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, ComposeMode::Editing { .. })
    }

    /// Replace the draft text
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Add character to draft
    pub fn add_char(&mut self, c: char) {
        self.draft.push(c);
    }

    /// Remove last character from draft
    pub fn backspace(&mut self) {
        self.draft.pop();
    }

    /// Switch to editing `message`, pre-filling the draft with its body
    ///
    /// # Returns
    /// False if `viewer_id` did not send the message or it is a system message
    pub fn begin_edit(&mut self, message: &Message, viewer_id: &str) -> bool {
        if !message.is_mutable_by(viewer_id) {
            return false;
        }
        self.mode = ComposeMode::Editing {
            message_id: message.id.clone(),
        };
        self.draft = message.body.clone();
        true
    }

    /// Leave editing mode without changing anything, discarding the draft
    pub fn cancel_edit(&mut self) {
        self.mode = ComposeMode::Composing;
        self.draft.clear();
    }

    /// Consume the draft and return to composing
    ///
    /// Returns `None` (and leaves the state untouched) for a blank draft.
    pub fn take_submission(&mut self) -> Option<Submission> {
        let body = self.draft.trim();
        if body.is_empty() {
            return None;
        }
        let body = body.to_string();
        let submission = match std::mem::take(&mut self.mode) {
            ComposeMode::Composing => Submission::Send { body },
            ComposeMode::Editing { message_id } => Submission::Edit { message_id, body },
        };
        self.draft.clear();
        Some(submission)
    }

    /// Submit the draft to `chat` through the store
    ///
    /// In editing mode the target message is edited in place; otherwise a new
    /// text message is sent. If the store rejects the send, the draft is
    /// restored so nothing the user typed is lost.
    pub async fn submit(&mut self, store: &ConversationStore, chat: &Chat) -> Result<Option<Message>> {
        let before = self.clone();
        let Some(submission) = self.take_submission() else {
            return Ok(None);
        };

        let result = match submission {
            Submission::Send { body } => store.send(&chat.target, &body, MessageKind::Text).await,
            Submission::Edit { message_id, body } => Ok(store.edit(&chat.id, &message_id, &body).await),
        };
        if result.is_err() {
            *self = before;
        }
        result
    }
}
