use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daily usage limit given to a freshly registered user
pub const DEFAULT_LIMIT: i64 = 20;

/// A registered chat user, keyed by messaging identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
    pub limit: i64,
    pub premium: bool,
    pub banned: bool,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            registered_at: Utc::now(),
            limit: DEFAULT_LIMIT,
            premium: false,
            banned: false,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Merge-patch for a [`User`]: set fields overwrite, `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub premium: Option<bool>,
    pub banned: Option<bool>,
}

impl UserPatch {
    pub fn banned(banned: bool) -> Self {
        Self {
            banned: Some(banned),
            ..Self::default()
        }
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(limit) = self.limit {
            user.limit = limit;
        }
        if let Some(premium) = self.premium {
            user.premium = premium;
        }
        if let Some(banned) = self.banned {
            user.banned = banned;
        }
    }
}
