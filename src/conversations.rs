//! Conversation store
//!
//! This module owns every chat and its messages:
//! - `open_for_user` / `open_for_group` - find or materialize a chat
//! - `send`, `edit`, `delete` - message lifecycle with preview bookkeeping
//! - `filter` - chat list search combined with a category filter
//!
//! Group-backed chats never cache membership: every composability check goes
//! to the live `GroupRegistry`, so leaving a group downgrades its chat at once.

use crate::{
    groups::GroupRegistry,
    session::Timer,
    storage::{Chat, ChatTarget, CurrentUser, Group, Message, MessageKind, Settings, UserDirectory},
    Error, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Chat list category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatFilter {
    /// Everything except archived chats
    #[default]
    All,
    /// Chats with unread messages
    Unread,
    /// Secret chats
    Secret,
    /// Archived chats only
    Archived,
    /// Group-backed chats
    Groups,
}

impl ChatFilter {
    /// Get all filters in display order
    pub fn all() -> Vec<Self> {
        vec![Self::All, Self::Unread, Self::Secret, Self::Archived, Self::Groups]
    }

    /// Whether `chat` belongs to this category
    pub fn matches(&self, chat: &Chat) -> bool {
        match self {
            Self::All => !chat.archived,
            Self::Unread => chat.unread_count > 0,
            Self::Secret => chat.secret,
            Self::Archived => chat.archived,
            Self::Groups => chat.is_group(),
        }
    }
}

#[derive(Debug, Default)]
struct Inbox {
    chats: Vec<Chat>,
    active_chat_id: Option<String>,
}

impl Inbox {
    fn chat_mut(&mut self, chat_id: &str) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id == chat_id)
    }

    fn position_of(&self, target: &ChatTarget) -> Option<usize> {
        self.chats.iter().position(|c| &c.target == target)
    }
}

/// Shared handle to the viewer's conversations
///
/// Constructed once with its collaborators and cloned into every consumer.
#[derive(Clone)]
pub struct ConversationStore {
    viewer: Arc<CurrentUser>,
    inbox: Arc<RwLock<Inbox>>,
    groups: GroupRegistry,
    directory: Arc<dyn UserDirectory>,
    settings: Arc<Settings>,
    typing_timers: Arc<Mutex<HashMap<String, Timer>>>,
}

impl ConversationStore {
    /// Create an empty store for `viewer`
    pub fn new(
        viewer: CurrentUser,
        groups: GroupRegistry,
        directory: Arc<dyn UserDirectory>,
        settings: Settings,
    ) -> Self {
        Self {
            viewer: Arc::new(viewer),
            inbox: Arc::new(RwLock::new(Inbox::default())),
            groups,
            directory,
            settings: Arc::new(settings),
            typing_timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The viewer this store acts for
    pub fn viewer(&self) -> &CurrentUser {
        &self.viewer
    }

    /// The settings the store was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Snapshot of every chat
    pub async fn chats(&self) -> Vec<Chat> {
        self.inbox.read().await.chats.clone()
    }

    /// Look up a chat by id
    pub async fn chat(&self, chat_id: &str) -> Option<Chat> {
        self.inbox
            .read()
            .await
            .chats
            .iter()
            .find(|c| c.id == chat_id)
            .cloned()
    }

    /// Look up the chat keyed by a counter-party or group
    pub async fn chat_for(&self, target: &ChatTarget) -> Option<Chat> {
        let inbox = self.inbox.read().await;
        inbox.position_of(target).map(|idx| inbox.chats[idx].clone())
    }

    /// Id of the chat currently in view
    pub async fn active_chat_id(&self) -> Option<String> {
        self.inbox.read().await.active_chat_id.clone()
    }

    /// Bring a chat into view (or none)
    ///
    /// The chat being left loses its pending typing timer; the chat being
    /// opened is marked read.
    ///
    /// # Returns
    /// False if `chat_id` is unknown, in which case nothing changes
    pub async fn set_active(&self, chat_id: Option<&str>) -> bool {
        let mut inbox = self.inbox.write().await;
        if let Some(id) = chat_id {
            if !inbox.chats.iter().any(|c| c.id == id) {
                return false;
            }
        }

        let previous = inbox.active_chat_id.take();
        if let Some(prev) = previous.as_deref().filter(|p| Some(*p) != chat_id) {
            self.typing_timers.lock().await.remove(prev);
            if let Some(chat) = inbox.chat_mut(prev) {
                chat.typing = false;
            }
        }

        if let Some(id) = chat_id {
            if let Some(chat) = inbox.chat_mut(id) {
                chat.mark_read();
            }
        }
        inbox.active_chat_id = chat_id.map(str::to_string);
        true
    }

    /// Return the direct chat with `user_id`, creating it if needed
    pub async fn open_for_user(&self, user_id: &str) -> Chat {
        let target = ChatTarget::User(user_id.to_string());
        let mut inbox = self.inbox.write().await;
        if let Some(idx) = inbox.position_of(&target) {
            return inbox.chats[idx].clone();
        }

        let chat = self.new_direct_chat(user_id);
        tracing::info!("Opened new chat {} with {}", chat.id, user_id);
        inbox.chats.insert(0, chat.clone());
        chat
    }

    /// Return the chat backed by `group`, creating it if needed
    ///
    /// The chat id is the group id, so repeated opens never duplicate chats.
    /// An existing chat has its cached name and avatar refreshed.
    pub async fn open_for_group(&self, group: &Group) -> Chat {
        let target = ChatTarget::Group(group.id.clone());
        let mut inbox = self.inbox.write().await;
        if let Some(idx) = inbox.position_of(&target) {
            let chat = &mut inbox.chats[idx];
            chat.name = group.name.clone();
            chat.avatar = group.cover_image.clone();
            return chat.clone();
        }

        let chat = Chat::for_group(&group.id, group.name.clone(), group.cover_image.clone());
        tracing::info!("Opened chat for group {}", group.id);
        inbox.chats.insert(0, chat.clone());
        chat
    }

    /// Whether the viewer may compose in `chat`
    ///
    /// Always checked against the live group for group-backed chats.
    pub async fn is_member(&self, chat: &Chat) -> bool {
        match &chat.target {
            ChatTarget::User(_) => true,
            ChatTarget::Group(group_id) => self.groups.is_member(group_id, &self.viewer.id).await,
        }
    }

    /// Name to show for `chat`, preferring the live group
    pub async fn display_name(&self, chat: &Chat) -> String {
        match &chat.target {
            ChatTarget::User(_) => chat.name.clone(),
            ChatTarget::Group(group_id) => self
                .groups
                .get(group_id)
                .await
                .map(|g| g.name)
                .unwrap_or_else(|| chat.name.clone()),
        }
    }

    /// Send a message as the viewer
    ///
    /// Direct chats are created on first send and show a transient counterpart
    /// typing indicator afterwards; the message list itself is untouched by it.
    ///
    /// # Returns
    /// * `Ok(Some(message))` - Message appended
    /// * `Ok(None)` - Empty text, or the target group does not exist
    ///
    /// # Errors
    /// Returns `Error::NotMember` if the viewer is not in the target group
    pub async fn send(&self, target: &ChatTarget, body: &str, kind: MessageKind) -> Result<Option<Message>> {
        if kind == MessageKind::Text && body.trim().is_empty() {
            tracing::debug!("Ignoring empty message to {}", target.key());
            return Ok(None);
        }

        let group = match target {
            ChatTarget::User(_) => None,
            ChatTarget::Group(group_id) => {
                let Some(group) = self.groups.get(group_id).await else {
                    tracing::debug!("Send ignored: group {} not found", group_id);
                    return Ok(None);
                };
                if !group.is_member(&self.viewer.id) {
                    tracing::warn!("{} tried to post in {} without membership", self.viewer.id, group_id);
                    return Err(Error::NotMember(group_id.clone()));
                }
                Some(group)
            }
        };

        let message = Message::new(self.viewer.id.clone(), body, kind);
        let chat_id = {
            let mut inbox = self.inbox.write().await;
            let idx = match inbox.position_of(target) {
                Some(idx) => idx,
                None => {
                    let chat = match &group {
                        Some(group) => {
                            Chat::for_group(&group.id, group.name.clone(), group.cover_image.clone())
                        }
                        None => self.new_direct_chat(target.key()),
                    };
                    inbox.chats.insert(0, chat);
                    0
                }
            };
            let chat = &mut inbox.chats[idx];
            chat.append_message(message.clone(), self.settings.preview_max_chars);
            if !target.is_group() {
                chat.typing = true;
            }
            chat.id.clone()
        };

        tracing::debug!("Message {} sent to chat {}", message.id, chat_id);
        if !target.is_group() {
            self.schedule_typing_clear(&chat_id).await;
        }
        Ok(Some(message))
    }

    /// Replace the body of one of the viewer's messages
    ///
    /// # Returns
    /// The edited message, or `None` if the message is not in that chat, is a
    /// system message, was sent by someone else, or `new_body` is blank
    pub async fn edit(&self, chat_id: &str, message_id: &str, new_body: &str) -> Option<Message> {
        if new_body.trim().is_empty() {
            return None;
        }
        let mut inbox = self.inbox.write().await;
        let chat = inbox.chat_mut(chat_id)?;
        let message = chat.message_mut(message_id)?;
        if !message.is_mutable_by(&self.viewer.id) {
            tracing::debug!("Edit ignored: message {} is not editable by {}", message_id, self.viewer.id);
            return None;
        }

        message.apply_edit(new_body);
        let edited = message.clone();
        chat.refresh_preview(self.settings.preview_max_chars);
        Some(edited)
    }

    /// Delete one of the viewer's messages
    ///
    /// # Returns
    /// The removed message, or `None` if nothing was removed
    pub async fn delete(&self, chat_id: &str, message_id: &str) -> Option<Message> {
        let mut inbox = self.inbox.write().await;
        let chat = inbox.chat_mut(chat_id)?;
        if !chat.message(message_id)?.is_mutable_by(&self.viewer.id) {
            tracing::debug!("Delete ignored: message {} is not deletable by {}", message_id, self.viewer.id);
            return None;
        }
        chat.remove_message(message_id, self.settings.preview_max_chars)
    }

    /// Record a message from someone else
    ///
    /// Counts as unread unless the chat is in view, and clears the typing
    /// indicator.
    pub async fn receive(&self, chat_id: &str, sender_id: &str, body: &str, kind: MessageKind) -> Option<Message> {
        let message = Message::new(sender_id, body, kind);
        let mut inbox = self.inbox.write().await;
        let is_active = inbox.active_chat_id.as_deref() == Some(chat_id);
        let chat = inbox.chat_mut(chat_id)?;
        chat.append_message(message.clone(), self.settings.preview_max_chars);
        chat.typing = false;
        if !is_active {
            chat.mark_unread();
        }
        Some(message)
    }

    /// Append a system annotation to a chat
    pub async fn post_system_notice(&self, chat_id: &str, text: &str) -> Option<Message> {
        let message = Message::system(text);
        let mut inbox = self.inbox.write().await;
        let chat = inbox.chat_mut(chat_id)?;
        chat.append_message(message.clone(), self.settings.preview_max_chars);
        Some(message)
    }

    /// Reset the unread counter
    pub async fn mark_read(&self, chat_id: &str) -> Option<Chat> {
        self.update_chat(chat_id, Chat::mark_read).await
    }

    /// Archive or unarchive a chat
    pub async fn set_archived(&self, chat_id: &str, archived: bool) -> Option<Chat> {
        self.update_chat(chat_id, |c| c.archived = archived).await
    }

    /// Mute or unmute a chat
    pub async fn set_muted(&self, chat_id: &str, muted: bool) -> Option<Chat> {
        self.update_chat(chat_id, |c| c.muted = muted).await
    }

    /// Remove every message from a chat, keeping the chat itself
    pub async fn clear_history(&self, chat_id: &str) -> Option<Chat> {
        self.update_chat(chat_id, Chat::clear_messages).await
    }

    /// Remove a chat entirely
    pub async fn delete_chat(&self, chat_id: &str) -> Option<Chat> {
        let mut inbox = self.inbox.write().await;
        let idx = inbox.chats.iter().position(|c| c.id == chat_id)?;
        let removed = inbox.chats.remove(idx);
        if inbox.active_chat_id.as_deref() == Some(chat_id) {
            inbox.active_chat_id = None;
        }
        drop(inbox);
        self.typing_timers.lock().await.remove(chat_id);
        tracing::info!("Deleted chat {}", chat_id);
        Some(removed)
    }

    /// Chats matching `query` within `filter`
    ///
    /// The query matches the display name or the last-message preview,
    /// case-insensitively. Group-backed chats are returned with their name and
    /// avatar resolved from the live group.
    pub async fn filter(&self, query: &str, filter: ChatFilter) -> Vec<Chat> {
        let query = query.trim().to_lowercase();
        let groups = self.groups.all().await;
        let chats = self.chats().await;

        chats
            .into_iter()
            .map(|mut chat| {
                if let ChatTarget::Group(group_id) = &chat.target {
                    if let Some(group) = groups.iter().find(|g| &g.id == group_id) {
                        chat.name = group.name.clone();
                        chat.avatar = group.cover_image.clone();
                    }
                }
                chat
            })
            .filter(|chat| filter.matches(chat))
            .filter(|chat| {
                query.is_empty()
                    || chat.name.to_lowercase().contains(&query)
                    || chat
                        .last_message
                        .as_deref()
                        .is_some_and(|m| m.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Number of typing-indicator timers being tracked
    ///
    /// Finished timers are pruned whenever a new one is scheduled.
    pub async fn tracked_typing_timers(&self) -> usize {
        self.typing_timers.lock().await.len()
    }

    /// Insert a chat built elsewhere (seed data, restored state)
    ///
    /// Ignored if a chat with the same id or target already exists.
    pub async fn insert_chat(&self, mut chat: Chat) -> bool {
        let mut inbox = self.inbox.write().await;
        if inbox.chats.iter().any(|c| c.id == chat.id || c.target == chat.target) {
            return false;
        }
        chat.refresh_preview(self.settings.preview_max_chars);
        inbox.chats.push(chat);
        true
    }

    fn new_direct_chat(&self, user_id: &str) -> Chat {
        match self.directory.lookup(user_id) {
            Some(profile) => {
                let mut chat = Chat::for_user(user_id, profile.display_name);
                chat.avatar = profile.avatar;
                chat.online = profile.online;
                chat
            }
            None => Chat::for_user(user_id, user_id.to_string()),
        }
    }

    async fn update_chat<F>(&self, chat_id: &str, update: F) -> Option<Chat>
    where
        F: FnOnce(&mut Chat),
    {
        let mut inbox = self.inbox.write().await;
        let chat = inbox.chat_mut(chat_id)?;
        update(chat);
        Some(chat.clone())
    }

    async fn schedule_typing_clear(&self, chat_id: &str) {
        let inbox = Arc::clone(&self.inbox);
        let id = chat_id.to_string();
        let timer = Timer::after(self.settings.typing_indicator(), async move {
            if let Some(chat) = inbox.write().await.chat_mut(&id) {
                chat.typing = false;
            }
        });
        let mut timers = self.typing_timers.lock().await;
        timers.retain(|_, t| t.is_running());
        timers.insert(chat_id.to_string(), timer);
    }
}
