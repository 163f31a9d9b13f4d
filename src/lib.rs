//! Agora - client-side domain core for a social messaging application
//!
//! This library owns the state a messaging client reasons about: group
//! membership, conversations and their messages, the per-chat call,
//! voice-recording and compose sessions, and the contextual action catalogue
//! shown for posts, messages, chats, profiles and groups.
//!
//! Rendering, navigation, transport and media capture live outside this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod conversations;
pub mod groups;
pub mod session;
pub mod storage;

pub use actions::{resolve_actions, ActionSet};
pub use conversations::{ChatFilter, ConversationStore};
pub use groups::GroupRegistry;

/// Result type alias for Agora operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Agora operations
///
/// Missing groups, chats or messages are not errors: mutators report them as
/// `None` and leave state untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation attempted without an authenticated actor
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Composition attempted in a group chat the viewer does not belong to
    #[error("Not a member of group {0}")]
    NotMember(String),

    /// Catalogue or settings file error
    #[error("Storage error: {0}")]
    Storage(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Initialize logging for a host application
pub fn init() {
    tracing_subscriber::fmt::init();
}
