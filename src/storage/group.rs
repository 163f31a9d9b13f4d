//! Group entity, draft builder and per-viewer role derivation
//!
//! Membership is the single source of truth: `member_count` mirrors
//! `members.len()` after every mutation and roles are derived from
//! `members`/`admins` for whoever is asking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name given to groups created without one
pub const DEFAULT_GROUP_NAME: &str = "New Group";
/// Category given to groups created without one
pub const DEFAULT_GROUP_CATEGORY: &str = "General";

/// Who may discover a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    /// Listed in discovery, anyone may join
    Public,
    /// Listed in discovery
    Private,
    /// Never listed to non-members
    Secret,
}

impl Default for Privacy {
    fn default() -> Self {
        Self::Public
    }
}

/// The viewer's relationship to a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    /// Member with administrative rights
    Admin,
    /// Regular member
    Member,
    /// Not a member
    None,
}

impl GroupRole {
    /// Whether this role implies membership
    pub fn is_member(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A community with a membership set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Discovery category
    #[serde(default)]
    pub category: String,
    /// Cover image reference
    #[serde(default)]
    pub cover_image: Option<String>,
    /// Discovery visibility
    #[serde(default)]
    pub privacy: Privacy,
    /// Member user ids in join order
    #[serde(default)]
    pub members: Vec<String>,
    /// Users holding the admin role (always a subset of `members`)
    #[serde(default)]
    pub admins: BTreeSet<String>,
    /// Cached `members.len()`
    #[serde(default)]
    pub member_count: usize,
    /// Whether the AI assistant is enabled
    #[serde(default)]
    pub ai_enabled: bool,
    /// Whether a voice room is live
    #[serde(default)]
    pub voice_room_active: bool,
    /// Ordered tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Last activity, as display text
    #[serde(default)]
    pub last_active: String,
}

impl Group {
    /// Whether `user_id` belongs to the group
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Role of `user_id` in this group
    pub fn role_of(&self, user_id: &str) -> GroupRole {
        if !self.is_member(user_id) {
            GroupRole::None
        } else if self.admins.contains(user_id) {
            GroupRole::Admin
        } else {
            GroupRole::Member
        }
    }

    /// Add a member. Returns false if already present.
    ///
    /// Someone joining a group with no admin takes the role.
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.members.push(user_id.to_string());
        self.member_count = self.members.len();
        self.ensure_admin();
        true
    }

    /// Remove a member and any admin right they held. Returns false if absent.
    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user_id);
        if self.members.len() == before {
            return false;
        }
        self.admins.remove(user_id);
        self.member_count = self.member_count.saturating_sub(1).min(self.members.len());
        self.ensure_admin();
        true
    }

    /// Whether the cached count and admin set agree with `members`
    ///
    /// A group with members always has at least one admin.
    pub fn is_consistent(&self) -> bool {
        self.member_count == self.members.len()
            && self.admins.iter().all(|a| self.is_member(a))
            && (self.members.is_empty() || !self.admins.is_empty())
    }

    /// Repair cached fields after loading from an external source
    ///
    /// Seed data lists the founding admin first; if no admin is recorded the
    /// first member is promoted.
    pub fn normalize(&mut self) {
        let mut seen = BTreeSet::new();
        self.members.retain(|m| seen.insert(m.clone()));
        self.member_count = self.members.len();
        let members = &self.members;
        self.admins.retain(|a| members.contains(a));
        self.ensure_admin();
    }

    /// Promote the longest-standing member if nobody holds the admin role
    fn ensure_admin(&mut self) {
        if self.admins.is_empty() {
            if let Some(first) = self.members.first() {
                self.admins.insert(first.clone());
            }
        }
    }

    /// Whether the group matches a case-insensitive query on name,
    /// description or tags
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

/// Creation parameters for a group
///
/// Every field is optional; defaults are applied once in [`GroupDraft::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDraft {
    /// Display name
    pub name: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Discovery category
    pub category: Option<String>,
    /// Cover image reference
    pub cover_image: Option<String>,
    /// Visibility
    pub privacy: Option<Privacy>,
    /// Whether the AI assistant is enabled
    pub ai_enabled: bool,
    /// Tags
    pub tags: Vec<String>,
}

impl GroupDraft {
    /// Start an empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the cover image reference
    pub fn cover_image(mut self, cover: impl Into<String>) -> Self {
        self.cover_image = Some(cover.into());
        self
    }

    /// Set the privacy level
    pub fn privacy(mut self, privacy: Privacy) -> Self {
        self.privacy = Some(privacy);
        self
    }

    /// Enable or disable the AI assistant
    pub fn ai_enabled(mut self, enabled: bool) -> Self {
        self.ai_enabled = enabled;
        self
    }

    /// Append a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Materialize the draft into a group owned by `creator_id`
    ///
    /// Blank names and categories fall back to the given defaults.
    pub fn build(self, id: String, creator_id: &str, default_name: &str, default_category: &str) -> Group {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_name.to_string());
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_category.to_string());

        let mut admins = BTreeSet::new();
        admins.insert(creator_id.to_string());

        Group {
            id,
            name,
            description: self.description.unwrap_or_default(),
            category,
            cover_image: self.cover_image,
            privacy: self.privacy.unwrap_or_default(),
            members: vec![creator_id.to_string()],
            admins,
            member_count: 1,
            ai_enabled: self.ai_enabled,
            voice_room_active: false,
            tags: self.tags,
            last_active: "Just now".to_string(),
        }
    }
}
