//! Runtime configuration for stores and sessions

use crate::storage::group::{DEFAULT_GROUP_CATEGORY, DEFAULT_GROUP_NAME};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Core settings
///
/// Stored in JSON format; missing fields take their defaults.
///
/// # Example
/// ```rust,no_run
/// use agora::storage::Settings;
///
/// let settings = Settings::load("agora.json").expect("Failed to load");
/// println!("Calls connect after {:?}", settings.call_connect_delay());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay before an outgoing call is considered connected
    pub call_connect_delay_ms: u64,
    /// Period of call and recording duration counters
    pub tick_interval_ms: u64,
    /// How long the counterpart typing indicator stays visible
    pub typing_indicator_ms: u64,
    /// Name for groups created without one
    pub default_group_name: String,
    /// Category for groups created without one
    pub default_group_category: String,
    /// Maximum characters of text shown in chat previews
    pub preview_max_chars: usize,
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// Returns the defaults if the file doesn't exist or is empty.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read settings: {}", e)))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&data)
            .map_err(|e| Error::Storage(format!("Failed to parse settings: {}", e)))
    }

    /// Save settings to a JSON file, creating parent directories
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create settings directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| Error::Storage(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Call setup delay
    pub fn call_connect_delay(&self) -> Duration {
        Duration::from_millis(self.call_connect_delay_ms)
    }

    /// Duration counter period (never zero)
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Typing indicator lifetime
    pub fn typing_indicator(&self) -> Duration {
        Duration::from_millis(self.typing_indicator_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            call_connect_delay_ms: 2_000,
            tick_interval_ms: 1_000,
            typing_indicator_ms: 3_000,
            default_group_name: DEFAULT_GROUP_NAME.to_string(),
            default_group_category: DEFAULT_GROUP_CATEGORY.to_string(),
            preview_max_chars: 60,
        }
    }
}
