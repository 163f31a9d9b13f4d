//! Group registry
//!
//! This module owns the canonical group collection and exposes:
//! - `create`, `join` and `leave` mutators
//! - `all`, `mine` and `public` read views, recomputed on every call
//!
//! Missing groups and already-satisfied preconditions are idempotent no-ops
//! reported as `None`; only a missing actor on `create` is an error.

use crate::{
    storage::{Catalogue, CurrentUser, Group, GroupDraft, Privacy, Settings},
    Error, Result,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the group collection
///
/// Cloning is cheap; every clone sees the same groups.
///
/// # Example
/// ```rust,no_run
/// use agora::groups::GroupRegistry;
/// use agora::storage::{CurrentUser, GroupDraft, Settings};
///
/// # async fn example() -> agora::Result<()> {
/// let registry = GroupRegistry::new(Settings::default());
/// let me = CurrentUser::new("u1", "Ada");
///
/// let group = registry.create(GroupDraft::new().name("Rustaceans"), Some(&me)).await?;
/// assert_eq!(registry.mine(&me.id).await[0].id, group.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: Arc<RwLock<Vec<Group>>>,
    settings: Arc<Settings>,
}

impl GroupRegistry {
    /// Create an empty registry
    pub fn new(settings: Settings) -> Self {
        Self::with_groups(Vec::new(), settings)
    }

    /// Create a registry seeded from a catalogue
    pub fn from_catalogue(catalogue: &Catalogue, settings: Settings) -> Self {
        let mut catalogue = catalogue.clone();
        catalogue.normalize();
        Self::with_groups(catalogue.groups, settings)
    }

    fn with_groups(groups: Vec<Group>, settings: Settings) -> Self {
        Self {
            groups: Arc::new(RwLock::new(groups)),
            settings: Arc::new(settings),
        }
    }

    /// Every group, most recent first
    pub async fn all(&self) -> Vec<Group> {
        self.groups.read().await.clone()
    }

    /// Look up a group by id
    pub async fn get(&self, group_id: &str) -> Option<Group> {
        self.groups
            .read()
            .await
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
    }

    /// Groups the viewer belongs to
    pub async fn mine(&self, viewer_id: &str) -> Vec<Group> {
        self.groups
            .read()
            .await
            .iter()
            .filter(|g| g.is_member(viewer_id))
            .cloned()
            .collect()
    }

    /// Discoverable groups the viewer does not belong to
    pub async fn public(&self, viewer_id: &str) -> Vec<Group> {
        self.groups
            .read()
            .await
            .iter()
            .filter(|g| !g.is_member(viewer_id) && g.privacy != Privacy::Secret)
            .cloned()
            .collect()
    }

    /// Groups visible to the viewer whose name, description or tags match
    pub async fn search(&self, viewer_id: &str, query: &str) -> Vec<Group> {
        self.groups
            .read()
            .await
            .iter()
            .filter(|g| g.is_member(viewer_id) || g.privacy != Privacy::Secret)
            .filter(|g| g.matches(query))
            .cloned()
            .collect()
    }

    /// Create a group owned by `creator`
    ///
    /// The creator becomes the only member and admin, and the group is placed
    /// at the front of the collection.
    ///
    /// # Errors
    /// Returns `Error::PermissionDenied` if there is no authenticated creator
    pub async fn create(&self, draft: GroupDraft, creator: Option<&CurrentUser>) -> Result<Group> {
        let Some(creator) = creator else {
            tracing::warn!("Rejected group creation without an authenticated user");
            return Err(Error::PermissionDenied(
                "creating a group requires a signed-in user".to_string(),
            ));
        };

        let mut groups = self.groups.write().await;
        let id = loop {
            let candidate = uuid::Uuid::new_v4().to_string();
            if !groups.iter().any(|g| g.id == candidate) {
                break candidate;
            }
        };
        let group = draft.build(
            id,
            &creator.id,
            &self.settings.default_group_name,
            &self.settings.default_group_category,
        );
        debug_assert!(group.is_consistent());

        groups.insert(0, group.clone());
        tracing::info!("Group {} ({}) created by {}", group.id, group.name, creator.id);
        Ok(group)
    }

    /// Add `user` to a group
    ///
    /// # Returns
    /// The updated group, or `None` if the group is unknown, there is no user,
    /// or the user is already a member
    pub async fn join(&self, group_id: &str, user: Option<&CurrentUser>) -> Option<Group> {
        let user = user?;
        let mut groups = self.groups.write().await;
        let Some(group) = groups.iter_mut().find(|g| g.id == group_id) else {
            tracing::debug!("Join ignored: group {} not found", group_id);
            return None;
        };

        if !group.add_member(&user.id) {
            tracing::debug!("Join ignored: {} already in {}", user.id, group_id);
            return None;
        }
        debug_assert!(group.is_consistent());

        tracing::info!("{} joined group {} ({} members)", user.id, group_id, group.member_count);
        Some(group.clone())
    }

    /// Remove `user` from a group
    ///
    /// # Returns
    /// The updated group, or `None` if the group is unknown, there is no user,
    /// or the user is not a member
    pub async fn leave(&self, group_id: &str, user: Option<&CurrentUser>) -> Option<Group> {
        let user = user?;
        let mut groups = self.groups.write().await;
        let Some(group) = groups.iter_mut().find(|g| g.id == group_id) else {
            tracing::debug!("Leave ignored: group {} not found", group_id);
            return None;
        };

        if !group.remove_member(&user.id) {
            tracing::debug!("Leave ignored: {} not in {}", user.id, group_id);
            return None;
        }
        debug_assert!(group.is_consistent());

        tracing::info!("{} left group {} ({} members)", user.id, group_id, group.member_count);
        Some(group.clone())
    }

    /// Flag whether a group's voice room is live
    pub async fn set_voice_room_active(&self, group_id: &str, active: bool) -> Option<Group> {
        let mut groups = self.groups.write().await;
        let group = groups.iter_mut().find(|g| g.id == group_id)?;
        group.voice_room_active = active;
        Some(group.clone())
    }

    /// Whether `user_id` currently belongs to `group_id`
    pub async fn is_member(&self, group_id: &str, user_id: &str) -> bool {
        self.groups
            .read()
            .await
            .iter()
            .any(|g| g.id == group_id && g.is_member(user_id))
    }
}
