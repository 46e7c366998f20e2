use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered group chat and its moderation flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
    pub antilink: bool,
    pub antitoxic: bool,
    pub welcome: bool,
    pub leave: bool,
    pub nsfw: bool,
}

/// Merge-patch for a [`Group`]
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub antilink: Option<bool>,
    pub antitoxic: Option<bool>,
    pub welcome: Option<bool>,
    pub leave: Option<bool>,
    pub nsfw: Option<bool>,
}

impl GroupPatch {
    pub fn antilink(enabled: bool) -> Self {
        Self {
            antilink: Some(enabled),
            ..Self::default()
        }
    }

    pub fn apply(self, group: &mut Group) {
        if let Some(name) = self.name {
            group.name = name;
        }
        if let Some(v) = self.antilink {
            group.antilink = v;
        }
        if let Some(v) = self.antitoxic {
            group.antitoxic = v;
        }
        if let Some(v) = self.welcome {
            group.welcome = v;
        }
        if let Some(v) = self.leave {
            group.leave = v;
        }
        if let Some(v) = self.nsfw {
            group.nsfw = v;
        }
    }
}
