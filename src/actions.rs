//! Contextual action policy
//!
//! `resolve_actions` maps an object kind, the viewer's ownership and optional
//! typed data to an ordered catalogue of actions split into a compact quick
//! row and a full list. It is total: unknown kinds get share + copy-link.
//!
//! Labels and icons are a presentation concern; this module only decides
//! which actions exist, in which tier, with which severity.

use crate::storage::{Chat, GroupRole, Message, MessageKind};
use serde::{Deserialize, Serialize};

/// Kind of object an action menu is opened on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Feed post
    Post,
    /// Story
    Story,
    /// Short video
    Reel,
    /// User profile
    Profile,
    /// Conversation in the chat list
    Chat,
    /// Group
    Group,
    /// Chat message
    Message,
    /// Notification entry
    Notification,
    /// Comment on a post
    Comment,
    /// Anything else, kept verbatim
    Unknown(String),
}

impl ObjectKind {
    /// Parse a kind name; unrecognized names become `Unknown`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "post" => Self::Post,
            "story" => Self::Story,
            "reel" => Self::Reel,
            "profile" => Self::Profile,
            "chat" => Self::Chat,
            "group" => Self::Group,
            "message" => Self::Message,
            "notification" => Self::Notification,
            "comment" => Self::Comment,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

impl From<&str> for ObjectKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

/// Stable action identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    /// Reply to a message or comment
    Reply,
    /// Copy text
    Copy,
    /// Forward a message
    Forward,
    /// Edit own content
    Edit,
    /// Star a message
    Star,
    /// Retract own message for everyone
    Unsend,
    /// Report to moderators
    Report,
    /// Share externally
    Share,
    /// Copy a link
    CopyLink,
    /// Bookmark
    Save,
    /// Remove bookmark
    Unsave,
    /// Pin to top
    Pin,
    /// View reach statistics
    Insights,
    /// Delete own content
    Delete,
    /// Hide like counts
    HideLikes,
    /// Disable comments
    TurnOffComments,
    /// Stop following the author
    Unfollow,
    /// Show less of this
    NotInterested,
    /// Add author to favorites
    AddToFavorites,
    /// Add story to highlights
    Highlight,
    /// Silence notifications or content
    Mute,
    /// Undo mute
    Unmute,
    /// Remix a reel
    Remix,
    /// Show profile QR code
    QrCode,
    /// Open settings
    Settings,
    /// Limit interactions
    Restrict,
    /// Block the user
    Block,
    /// Archive a chat
    Archive,
    /// Restore an archived chat
    Unarchive,
    /// Remove all messages in a chat
    ClearHistory,
    /// Remove a chat
    DeleteChat,
    /// Mark as read
    MarkRead,
    /// Invite people to a group
    Invite,
    /// Open group administration
    ManageGroup,
    /// Leave a group
    LeaveGroup,
    /// Join a group
    JoinGroup,
    /// Stop notifications of this kind
    TurnOffNotifications,
}

/// Rendering tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    /// Compact top row
    Quick,
    /// Full list
    List,
}

/// How destructive an action is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Harmless
    #[default]
    Default,
    /// Soft-destructive or reversible
    Warning,
    /// Destructive or reporting
    Danger,
}

/// One entry in an action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Action id
    pub id: ActionId,
    /// Rendering tier
    pub tier: ActionTier,
    /// Severity
    pub severity: Severity,
}

impl ActionDescriptor {
    fn quick(id: ActionId) -> Self {
        Self {
            id,
            tier: ActionTier::Quick,
            severity: Severity::Default,
        }
    }

    fn list(id: ActionId) -> Self {
        Self::list_with(id, Severity::Default)
    }

    fn list_with(id: ActionId, severity: Severity) -> Self {
        Self {
            id,
            tier: ActionTier::List,
            severity,
        }
    }
}

/// Typed payload for the policies that look at object data
///
/// Each variant carries only what its policy reads. Data that does not match
/// the object kind is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionData {
    /// Post state
    Post {
        /// Viewer has bookmarked it
        saved: bool,
    },
    /// Chat list entry state
    Chat {
        /// Chat is archived
        archived: bool,
        /// Chat is muted
        muted: bool,
        /// Chat is backed by a group
        group: bool,
    },
    /// Viewer's role in a group
    Group {
        /// Derived role
        role: GroupRole,
    },
    /// Message fields
    Message {
        /// Message id
        id: String,
        /// Sender (absent for system messages)
        sender_id: Option<String>,
        /// Kind
        kind: MessageKind,
        /// Body
        body: String,
    },
}

impl ActionData {
    /// Data for a chat list entry
    pub fn from_chat(chat: &Chat) -> Self {
        Self::Chat {
            archived: chat.archived,
            muted: chat.muted,
            group: chat.is_group(),
        }
    }

    /// Data for a message
    pub fn from_message(message: &Message) -> Self {
        Self::Message {
            id: message.id.clone(),
            sender_id: message.sender_id.clone(),
            kind: message.kind,
            body: message.body.clone(),
        }
    }
}

/// Ordered action catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    actions: Vec<ActionDescriptor>,
}

impl ActionSet {
    fn from_parts(quick: &[ActionId], list: Vec<ActionDescriptor>) -> Self {
        let mut actions: Vec<ActionDescriptor> = quick.iter().copied().map(ActionDescriptor::quick).collect();
        actions.extend(list);
        Self { actions }
    }

    /// Every action in order, quick row first
    pub fn all(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    /// Quick-row actions in order
    pub fn quick(&self) -> Vec<ActionDescriptor> {
        self.by_tier(ActionTier::Quick)
    }

    /// List actions in order
    pub fn list(&self) -> Vec<ActionDescriptor> {
        self.by_tier(ActionTier::List)
    }

    /// Whether the quick row has anything to show
    pub fn has_quick_row(&self) -> bool {
        self.actions.iter().any(|a| a.tier == ActionTier::Quick)
    }

    /// Whether `id` is offered in any tier
    pub fn contains(&self, id: ActionId) -> bool {
        self.get(id).is_some()
    }

    /// Descriptor for `id`
    pub fn get(&self, id: ActionId) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Severity of `id`, if offered
    pub fn severity_of(&self, id: ActionId) -> Option<Severity> {
        self.get(id).map(|a| a.severity)
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether there are no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn by_tier(&self, tier: ActionTier) -> Vec<ActionDescriptor> {
        self.actions.iter().copied().filter(|a| a.tier == tier).collect()
    }
}

/// Resolve the action catalogue for an object
///
/// # Arguments
/// * `kind` - What the menu was opened on
/// * `is_owner` - Whether the viewer owns the object
/// * `data` - Optional typed payload refining the catalogue
pub fn resolve_actions(kind: &ObjectKind, is_owner: bool, data: Option<&ActionData>) -> ActionSet {
    use ActionId::*;
    use Severity::{Danger, Warning};
    let list = ActionDescriptor::list;
    let list_with = ActionDescriptor::list_with;

    match kind {
        ObjectKind::Post => {
            let saved = matches!(data, Some(ActionData::Post { saved: true }));
            let bookmark = if saved { Unsave } else { Save };
            if is_owner {
                ActionSet::from_parts(
                    &[Share, CopyLink, bookmark],
                    vec![
                        list(Edit),
                        list(Pin),
                        list(HideLikes),
                        list(TurnOffComments),
                        list(Insights),
                        list_with(Delete, Danger),
                    ],
                )
            } else {
                ActionSet::from_parts(
                    &[Share, CopyLink, bookmark],
                    vec![
                        list(AddToFavorites),
                        list(NotInterested),
                        list_with(Unfollow, Warning),
                        list_with(Report, Danger),
                    ],
                )
            }
        }
        ObjectKind::Story => ActionSet::from_parts(
            &[Share, CopyLink],
            vec![list_with(Mute, Warning), list_with(Report, Danger)],
        ),
        ObjectKind::Reel => ActionSet::from_parts(
            &[Share, CopyLink, Save],
            vec![list(Remix), list(NotInterested), list_with(Report, Danger)],
        ),
        ObjectKind::Profile => {
            if is_owner {
                ActionSet::from_parts(
                    &[Share, CopyLink, QrCode],
                    vec![list(Edit), list(Insights), list(Settings)],
                )
            } else {
                ActionSet::from_parts(
                    &[Share, CopyLink],
                    vec![
                        list_with(Mute, Warning),
                        list_with(Restrict, Warning),
                        list_with(Block, Danger),
                        list_with(Report, Danger),
                    ],
                )
            }
        }
        ObjectKind::Chat => {
            let (archived, muted, group) = match data {
                Some(ActionData::Chat { archived, muted, group }) => (*archived, *muted, *group),
                _ => (false, false, false),
            };
            let mut entries = vec![
                list(if archived { Unarchive } else { Archive }),
                list(if muted { Unmute } else { Mute }),
                list_with(ClearHistory, Warning),
            ];
            if group {
                entries.push(list_with(LeaveGroup, Danger));
            } else {
                entries.push(list_with(Block, Danger));
            }
            entries.push(list_with(DeleteChat, Danger));
            ActionSet::from_parts(&[Pin, MarkRead], entries)
        }
        ObjectKind::Group => {
            let role = match data {
                Some(ActionData::Group { role }) => *role,
                _ if is_owner => GroupRole::Admin,
                _ => GroupRole::None,
            };
            match role {
                GroupRole::Admin => ActionSet::from_parts(
                    &[Invite, Share],
                    vec![list(ManageGroup), list_with(Mute, Warning), list_with(LeaveGroup, Danger)],
                ),
                GroupRole::Member => ActionSet::from_parts(
                    &[Invite, Share],
                    vec![
                        list_with(Mute, Warning),
                        list_with(Report, Danger),
                        list_with(LeaveGroup, Danger),
                    ],
                ),
                GroupRole::None => ActionSet::from_parts(
                    &[JoinGroup, Share],
                    vec![list(CopyLink), list_with(Report, Danger)],
                ),
            }
        }
        ObjectKind::Message => {
            // System annotations are immutable whoever asks
            let is_owner = is_owner
                && !matches!(
                    data,
                    Some(ActionData::Message {
                        kind: MessageKind::System,
                        ..
                    })
                );
            let mut entries = Vec::new();
            if is_owner {
                entries.push(list(Edit));
            }
            entries.push(list(Star));
            if is_owner {
                entries.push(list_with(Unsend, Danger));
            } else {
                entries.push(list_with(Report, Danger));
            }
            ActionSet::from_parts(&[Reply, Copy, Forward], entries)
        }
        ObjectKind::Notification => ActionSet::from_parts(
            &[],
            vec![
                list(MarkRead),
                list_with(TurnOffNotifications, Warning),
                list_with(Delete, Warning),
            ],
        ),
        ObjectKind::Comment => ActionSet::from_parts(&[Reply, Copy], vec![list_with(Report, Danger)]),
        ObjectKind::Unknown(name) => {
            tracing::debug!("No action policy for {:?}, using defaults", name);
            default_actions()
        }
    }
}

/// Actions for a chat message as seen by `viewer_id`
///
/// Ownership is taken from the sender; system messages are never owned.
pub fn resolve_message_actions(message: &Message, viewer_id: &str) -> ActionSet {
    let is_owner = message.is_mutable_by(viewer_id);
    resolve_actions(&ObjectKind::Message, is_owner, Some(&ActionData::from_message(message)))
}

/// Minimal catalogue used for unrecognized kinds
pub fn default_actions() -> ActionSet {
    ActionSet::from_parts(&[ActionId::Share, ActionId::CopyLink], Vec::new())
}
