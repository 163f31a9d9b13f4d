//! Domain model
//!
//! The entities the stores own, plus configuration and seed data:
//! - `group` - Group entity, draft builder and role derivation
//! - `chat` - Conversation state and preview bookkeeping
//! - `message` - Messages, kinds and previews
//! - `user` - Viewer identity and the user directory seam
//! - `settings` - Timer delays and creation defaults
//! - `catalogue` - Seed groups and users loaded at startup

pub mod catalogue;
pub mod chat;
pub mod group;
pub mod message;
pub mod settings;
pub mod user;

pub use catalogue::Catalogue;
pub use chat::{Chat, ChatTarget};
pub use group::{Group, GroupDraft, GroupRole, Privacy};
pub use message::{Message, MessageKind};
pub use settings::Settings;
pub use user::{CurrentUser, InMemoryDirectory, UserDirectory, UserProfile};
