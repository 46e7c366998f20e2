//! Domain stores - typed repositories over the JSON tables
//!
//! Each store exclusively owns one file in the database directory and is the
//! only place its entity is mutated.

pub mod command_stats;
pub mod commerce;
pub mod groups;
pub mod settings;
pub mod users;

pub use command_stats::CommandStatStore;
pub use commerce::{format_money, CommerceStore, InsufficientFunds};
pub use groups::GroupStore;
pub use settings::SettingsStore;
pub use users::UserStore;

use crate::infrastructure::config::Config;

/// All domain stores of one bot instance
pub struct Stores {
    pub users: UserStore,
    pub groups: GroupStore,
    pub commands: CommandStatStore,
    pub commerce: CommerceStore,
    pub settings: SettingsStore,
}

impl Stores {
    /// Open (or create) every table under the configured database directory
    pub fn open(config: &Config) -> Self {
        let dir = &config.database.directory;
        tracing::info!("Opening tables in {}", dir.display());
        let settings = SettingsStore::open(dir.join("settings.json"), &config.settings, &config.group_defaults);
        let group_defaults = settings
            .group_defaults()
            .unwrap_or_else(|| config.group_defaults.clone());
        Self {
            users: UserStore::open(dir.join("users.json")),
            groups: GroupStore::open(dir.join("groups.json"), group_defaults),
            commands: CommandStatStore::open(dir.join("commands.json")),
            commerce: CommerceStore::open(dir.join("store.json")),
            settings,
        }
    }

    /// Restore persisted settings and group defaults to the configured ones
    pub fn reset_settings(&self, config: &Config) {
        self.settings.reset(&config.settings, &config.group_defaults);
        self.groups.set_defaults(config.group_defaults.clone());
    }

    /// Whether every table's last durable write succeeded
    pub fn healthy(&self) -> bool {
        self.users.is_healthy()
            && self.groups.is_healthy()
            && self.commands.is_healthy()
            && self.commerce.is_healthy()
            && self.settings.is_healthy()
    }
}
