//! Seed catalogue of groups and users

use crate::{
    storage::{group::Group, user::UserProfile},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial data a client starts from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    /// Known groups, most recent first
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Known user profiles
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

impl Catalogue {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalogue from JSON text, normalizing every group
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalogue: Catalogue = serde_json::from_str(json)?;
        catalogue.normalize();
        Ok(catalogue)
    }

    /// Load the catalogue from a file
    ///
    /// # Returns
    /// The loaded catalogue, or an empty one if the file doesn't exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(path_ref)
            .map_err(|e| Error::Storage(format!("Failed to read catalogue file: {}", e)))?;

        Self::from_json(&json)
    }

    /// Save the catalogue to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::Storage(format!("Failed to write catalogue file: {}", e)))?;
        Ok(())
    }

    /// Repair cached group fields and drop duplicate group ids
    pub fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.groups.retain(|g| {
            let fresh = seen.insert(g.id.clone());
            if !fresh {
                tracing::warn!("Dropping duplicate seed group {}", g.id);
            }
            fresh
        });
        for group in &mut self.groups {
            group.normalize();
        }
    }
}
