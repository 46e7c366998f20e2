//! Per-command usage counters

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::application::errors::StorageError;
use crate::domain::entities::CommandStat;
use crate::infrastructure::storage::{JsonFile, Table};

pub struct CommandStatStore {
    table: Table<CommandStat>,
}

impl CommandStatStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: JsonFile::open(path, BTreeMap::new()),
        }
    }

    /// Count one invocation of `command` by `user_id`.
    ///
    /// The counters are updated in memory even when the durable write fails;
    /// the error is returned so the caller can decide to ignore it.
    pub fn log_command(&self, command: &str, user_id: &str, success: bool) -> Result<CommandStat, StorageError> {
        self.table.write_durable(|stats| {
            let stat = stats.entry(command.to_string()).or_default();
            stat.record(user_id, success);
            stat.clone()
        })
    }

    pub fn get_stats(&self, command: &str) -> Option<CommandStat> {
        self.table.get(command)
    }

    pub fn get_all_stats(&self) -> BTreeMap<String, CommandStat> {
        self.table.all()
    }

    pub fn is_healthy(&self) -> bool {
        self.table.is_healthy()
    }
}
