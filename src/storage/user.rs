//! Viewer identity and user directory
//!
//! This module handles:
//! - `CurrentUser`, the authenticated actor every mutation is performed for
//! - `UserProfile`, the public face of any other user
//! - `UserDirectory`, the lookup seam used to resolve senders and counter-parties

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::storage::catalogue::Catalogue;

/// The authenticated viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Stable user id
    pub id: String,
    /// Name shown to other users
    pub display_name: String,
    /// Avatar image reference
    #[serde(default)]
    pub avatar: Option<String>,
}

impl CurrentUser {
    /// Create a viewer without an avatar
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar: None,
        }
    }
}

/// Public profile of a user, as returned by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user id
    pub id: String,
    /// Name shown in chat headers and bubbles
    pub display_name: String,
    /// Avatar image reference
    #[serde(default)]
    pub avatar: Option<String>,
    /// Presence hint
    #[serde(default)]
    pub online: bool,
}

impl UserProfile {
    /// Create an offline profile without an avatar
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar: None,
            online: false,
        }
    }

    /// Mark this profile as online
    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }
}

impl From<&CurrentUser> for UserProfile {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
            online: true,
        }
    }
}

/// Resolves user ids to profiles
pub trait UserDirectory: Send + Sync {
    /// Look up a user by id
    fn lookup(&self, id: &str) -> Option<UserProfile>;
}

/// Directory backed by a map, filled from the seed catalogue or by hand
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: HashMap<String, UserProfile>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from the users listed in a catalogue
    pub fn from_catalogue(catalogue: &Catalogue) -> Self {
        let mut directory = Self::new();
        for user in &catalogue.users {
            directory.insert(user.clone());
        }
        directory
    }

    /// Add or replace a profile
    pub fn insert(&mut self, profile: UserProfile) {
        self.users.insert(profile.id.clone(), profile);
    }

    /// Number of known users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for InMemoryDirectory {
    fn lookup(&self, id: &str) -> Option<UserProfile> {
        self.users.get(id).cloned()
    }
}
