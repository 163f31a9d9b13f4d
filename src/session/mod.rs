//! Ephemeral sessions scoped to the chat in view
//!
//! - `call` - Call phase machine with auto-connect and duration ticks
//! - `recording` - Voice-note capture with commit or discard
//! - `compose` - Draft buffer with compose/edit modes
//! - `timer` - Cancellable tokio-backed timers
//!
//! `ChatSession` ties the three machines to one chat. Sessions read chat and
//! group state but only change the stores through the conversation store's
//! send and edit paths.

pub mod call;
pub mod compose;
pub mod recording;
pub mod timer;

pub use call::{CallMedium, CallPhase, CallSession, CallState};
pub use compose::{ComposeMode, ComposeState, Submission};
pub use recording::{RecordingPhase, RecordingSession, RecordingState};
pub use timer::Timer;

use crate::conversations::ConversationStore;
use crate::storage::{Chat, ChatTarget, Message};
use crate::Result;

/// Everything the active chat owns
///
/// Closing or dropping the session cancels every timer it started.
#[derive(Debug)]
pub struct ChatSession {
    chat_id: String,
    target: ChatTarget,
    /// Input draft and mode
    pub compose: ComposeState,
    recording: RecordingSession,
    call: CallSession,
}

impl ChatSession {
    /// Open a session on `chat_id` and make it the active chat
    ///
    /// Returns `None` if the chat does not exist.
    pub async fn open(store: &ConversationStore, chat_id: &str) -> Option<Self> {
        let chat = store.chat(chat_id).await?;
        store.set_active(Some(chat_id)).await;
        Some(Self::for_chat(store, &chat))
    }

    /// Build a session for `chat` without touching the active chat
    pub fn for_chat(store: &ConversationStore, chat: &Chat) -> Self {
        let settings = store.settings();
        Self {
            chat_id: chat.id.clone(),
            target: chat.target.clone(),
            compose: ComposeState::new(),
            recording: RecordingSession::new(settings),
            call: CallSession::new(settings),
        }
    }

    /// Id of the bound chat
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Counter-party or group of the bound chat
    pub fn target(&self) -> &ChatTarget {
        &self.target
    }

    /// Call machine
    pub fn call(&self) -> &CallSession {
        &self.call
    }

    /// Call machine, mutably
    pub fn call_mut(&mut self) -> &mut CallSession {
        &mut self.call
    }

    /// Recording machine
    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    /// Whether the viewer may post here, checked against live membership
    pub async fn can_compose(&self, store: &ConversationStore) -> bool {
        match store.chat(&self.chat_id).await {
            Some(chat) => store.is_member(&chat).await,
            None => false,
        }
    }

    /// Whether the text input should be offered
    ///
    /// Hidden while recording and when the viewer may not post.
    pub async fn input_enabled(&self, store: &ConversationStore) -> bool {
        !self.recording.is_recording().await && self.can_compose(store).await
    }

    /// Switch the input to editing one of the viewer's messages
    ///
    /// Refused while a voice note is being recorded.
    pub async fn begin_edit(&mut self, store: &ConversationStore, message_id: &str) -> bool {
        if self.recording.is_recording().await {
            return false;
        }
        let Some(chat) = store.chat(&self.chat_id).await else {
            return false;
        };
        match chat.message(message_id) {
            Some(message) => self.compose.begin_edit(message, &store.viewer().id),
            None => false,
        }
    }

    /// Submit the draft (send or edit)
    ///
    /// Does nothing while recording.
    pub async fn submit(&mut self, store: &ConversationStore) -> Result<Option<Message>> {
        if self.recording.is_recording().await {
            return Ok(None);
        }
        let Some(chat) = store.chat(&self.chat_id).await else {
            return Ok(None);
        };
        self.compose.submit(store, &chat).await
    }

    /// Start a voice note, suspending text input
    ///
    /// Any edit in progress is cancelled. Returns false if the viewer may not
    /// post here or a recording is already running.
    pub async fn start_recording(&mut self, store: &ConversationStore) -> bool {
        if !self.can_compose(store).await {
            return false;
        }
        if self.compose.is_editing() {
            self.compose.cancel_edit();
        }
        self.recording.start().await
    }

    /// Finish the voice note, sending it if `commit` is true
    pub async fn stop_recording(&mut self, store: &ConversationStore, commit: bool) -> Result<Option<Message>> {
        self.recording.stop(commit, store, &self.target).await
    }

    /// Place a call from this chat
    pub async fn start_call(&mut self, medium: CallMedium) -> bool {
        self.call.start(medium).await
    }

    /// Hang up
    pub async fn end_call(&mut self) -> bool {
        self.call.end().await
    }

    /// Tear the session down
    ///
    /// Discards any recording, ends any call and clears the active chat if it
    /// still points here.
    pub async fn close(mut self, store: &ConversationStore) {
        if self.recording.is_recording().await {
            if let Err(e) = self.recording.stop(false, store, &self.target).await {
                tracing::warn!("Failed to discard recording for chat {}: {}", self.chat_id, e);
            }
        }
        self.call.end().await;
        if store.active_chat_id().await.as_deref() == Some(self.chat_id.as_str()) {
            store.set_active(None).await;
        }
        tracing::debug!("Closed session for chat {}", self.chat_id);
    }
}
