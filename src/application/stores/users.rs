//! Registered users

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::entities::{User, UserPatch};
use crate::infrastructure::storage::{JsonFile, Table};

pub struct UserStore {
    table: Table<User>,
}

impl UserStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: JsonFile::open(path, BTreeMap::new()),
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.table.has(id)
    }

    /// Register a new user. Returns `false`, leaving the stored record
    /// untouched, when the id is already registered.
    pub fn register(&self, id: &str, name: &str) -> bool {
        self.table
            .try_write(|users| {
                if users.contains_key(id) {
                    return None;
                }
                users.insert(id.to_string(), User::new(id, name));
                Some(())
            })
            .is_some()
    }

    pub fn get(&self, id: &str) -> Option<User> {
        self.table.get(id)
    }

    /// Merge `patch` into a registered user; `false` if unknown
    pub fn update(&self, id: &str, patch: UserPatch) -> bool {
        self.table
            .try_write(|users| {
                let user = users.get_mut(id)?;
                patch.apply(user);
                Some(())
            })
            .is_some()
    }

    pub fn ban(&self, id: &str) -> bool {
        self.update(id, UserPatch::banned(true))
    }

    pub fn unban(&self, id: &str) -> bool {
        self.update(id, UserPatch::banned(false))
    }

    pub fn is_banned(&self, id: &str) -> bool {
        self.table.read(|users| users.get(id).is_some_and(|u| u.banned))
    }

    pub fn is_healthy(&self) -> bool {
        self.table.is_healthy()
    }
}
