//! Persisted runtime settings (`settings.json`)

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::infrastructure::config::{BotSettings, GroupDefaults};
use crate::infrastructure::storage::{JsonFile, Table};

const BOT_SETTINGS: &str = "botSettings";
const GROUP_SETTINGS: &str = "groupSettings";

pub struct SettingsStore {
    table: Table<Value>,
}

impl SettingsStore {
    /// Open the table, seeding it from the configured settings on first run
    pub fn open(path: impl Into<PathBuf>, bot: &BotSettings, groups: &GroupDefaults) -> Self {
        let mut template = BTreeMap::new();
        if let Ok(value) = serde_json::to_value(bot) {
            template.insert(BOT_SETTINGS.to_string(), value);
        }
        if let Ok(value) = serde_json::to_value(groups) {
            template.insert(GROUP_SETTINGS.to_string(), value);
        }
        Self {
            table: JsonFile::open(path, template),
        }
    }

    /// Persisted bot settings, if present and well-formed
    pub fn bot_settings(&self) -> Option<BotSettings> {
        self.section(BOT_SETTINGS)
    }

    /// Persisted defaults for newly registered groups
    pub fn group_defaults(&self) -> Option<GroupDefaults> {
        self.section(GROUP_SETTINGS)
    }

    pub fn save_bot_settings(&self, settings: &BotSettings) {
        self.save(BOT_SETTINGS, settings);
    }

    pub fn save_group_defaults(&self, defaults: &GroupDefaults) {
        self.save(GROUP_SETTINGS, defaults);
    }

    /// Overwrite both sections with the given defaults
    pub fn reset(&self, bot: &BotSettings, groups: &GroupDefaults) {
        self.save_bot_settings(bot);
        self.save_group_defaults(groups);
        tracing::info!("Settings reset to configured defaults");
    }

    pub fn is_healthy(&self) -> bool {
        self.table.is_healthy()
    }

    fn section<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.table.get(key)?;
        match serde_json::from_value(value) {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, section: &T) {
        match serde_json::to_value(section) {
            Ok(value) => self.table.set(key, value),
            Err(e) => tracing::error!("Failed to encode {}: {}", key, e),
        }
    }
}
