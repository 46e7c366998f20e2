//! Registered groups and their moderation flags

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::domain::entities::{Group, GroupPatch};
use crate::infrastructure::config::GroupDefaults;
use crate::infrastructure::storage::{JsonFile, Table};

pub struct GroupStore {
    table: Table<Group>,
    defaults: RwLock<GroupDefaults>,
}

impl GroupStore {
    pub fn open(path: impl Into<PathBuf>, defaults: GroupDefaults) -> Self {
        Self {
            table: JsonFile::open(path, BTreeMap::new()),
            defaults: RwLock::new(defaults),
        }
    }

    /// Flags applied to groups registered from now on
    pub fn defaults(&self) -> GroupDefaults {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the defaults; existing groups keep their flags
    pub fn set_defaults(&self, defaults: GroupDefaults) {
        *self.defaults.write().unwrap_or_else(PoisonError::into_inner) = defaults;
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.table.has(id)
    }

    /// Register a group seeded from the configured defaults.
    /// Returns `false` if it already exists.
    pub fn register(&self, id: &str, name: &str) -> bool {
        self.table
            .try_write(|groups| {
                if groups.contains_key(id) {
                    return None;
                }
                groups.insert(id.to_string(), self.seed(id, name));
                Some(())
            })
            .is_some()
    }

    pub fn get(&self, id: &str) -> Option<Group> {
        self.table.get(id)
    }

    pub fn update(&self, id: &str, patch: GroupPatch) -> bool {
        self.table
            .try_write(|groups| {
                let group = groups.get_mut(id)?;
                patch.apply(group);
                Some(())
            })
            .is_some()
    }

    /// Apply `patch`, registering the group first when needed
    pub fn upsert(&self, id: &str, name: &str, patch: GroupPatch) -> Group {
        self.table.write(|groups| {
            let group = groups
                .entry(id.to_string())
                .or_insert_with(|| self.seed(id, name));
            patch.apply(group);
            group.clone()
        })
    }

    /// Whether anti-link moderation is on; unregistered groups use the default
    pub fn antilink_enabled(&self, id: &str) -> bool {
        self.table
            .read(|groups| groups.get(id).map(|g| g.antilink))
            .unwrap_or_else(|| self.defaults().antilink)
    }

    pub fn is_healthy(&self) -> bool {
        self.table.is_healthy()
    }

    fn seed(&self, id: &str, name: &str) -> Group {
        let defaults = self.defaults();
        Group {
            id: id.to_string(),
            name: name.to_string(),
            registered_at: Utc::now(),
            antilink: defaults.antilink,
            antitoxic: defaults.antitoxic,
            welcome: defaults.welcome,
            leave: defaults.leave,
            nsfw: false,
        }
    }
}
