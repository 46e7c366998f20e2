//! Access policy - prefix, public/private mode and owner identities
//!
//! A [`Policy`] is an immutable snapshot. Owner commands build a new snapshot
//! and swap it into the [`PolicyHandle`], which also writes the settings back
//! to the settings table so they survive a restart.

use std::sync::{Arc, PoisonError, RwLock};

use crate::application::stores::SettingsStore;
use crate::domain::entities::normalize_number;
use crate::infrastructure::config::{BotSettings, OwnerConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    settings: BotSettings,
    owner_number: String,
    owner_numbers: Vec<String>,
}

impl Policy {
    pub fn new(settings: BotSettings, owner: &OwnerConfig) -> Self {
        Self {
            settings,
            owner_number: normalize_number(&owner.number),
            owner_numbers: owner
                .numbers
                .iter()
                .map(|n| normalize_number(n))
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn is_public(&self) -> bool {
        self.settings.public
    }

    /// Active command prefix; empty when prefix enforcement is off
    pub fn prefix(&self) -> &str {
        if !self.settings.prefix_enabled {
            ""
        } else if self.settings.custom_prefix.is_empty() {
            &self.settings.default_prefix
        } else {
            &self.settings.custom_prefix
        }
    }

    /// Whether `identity`, in any formatting, belongs to an owner
    pub fn is_owner(&self, identity: &str) -> bool {
        let number = normalize_number(identity);
        if number.is_empty() {
            return false;
        }
        number == self.owner_number || self.owner_numbers.contains(&number)
    }

    /// Personal chat identity of the primary owner
    pub fn owner_jid(&self) -> String {
        format!("{}{}", self.owner_number, crate::domain::entities::message::USER_SUFFIX)
    }

    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.settings.custom_prefix = prefix.into();
        next
    }

    pub fn with_public(&self, public: bool) -> Self {
        let mut next = self.clone();
        next.settings.public = public;
        next
    }

    /// Same owners, different settings
    pub fn with_settings(&self, settings: BotSettings) -> Self {
        Self {
            settings,
            ..self.clone()
        }
    }
}

/// Shared, swappable current policy
pub struct PolicyHandle {
    current: RwLock<Arc<Policy>>,
}

impl PolicyHandle {
    pub fn new(policy: Policy) -> Self {
        Self {
            current: RwLock::new(Arc::new(policy)),
        }
    }

    /// Build the startup policy: configured defaults overlaid with any
    /// settings persisted by earlier `setprefix`/`mode` calls
    pub fn load(defaults: &BotSettings, owner: &OwnerConfig, store: &SettingsStore) -> Self {
        let settings = store.bot_settings().unwrap_or_else(|| defaults.clone());
        Self::new(Policy::new(settings, owner))
    }

    pub fn snapshot(&self) -> Arc<Policy> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the policy with `f(current)` and persist its settings
    pub fn update(&self, store: &SettingsStore, f: impl FnOnce(&Policy) -> Policy) -> Arc<Policy> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(f(&current));
        store.save_bot_settings(next.settings());
        *current = Arc::clone(&next);
        tracing::info!(
            "Policy updated: prefix={:?} public={}",
            next.prefix(),
            next.is_public()
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::GroupDefaults;

    fn owner() -> OwnerConfig {
        OwnerConfig {
            name: "Owner".to_string(),
            number: "6283821115236".to_string(),
            numbers: vec!["6281111111111".to_string(), "+62 822-2222-2222".to_string()],
        }
    }

    #[test]
    fn test_is_owner_normalizes_identity() {
        let policy = Policy::new(BotSettings::default(), &owner());

        assert!(policy.is_owner("6283821115236@s.whatsapp.net"));
        assert!(policy.is_owner("wa.me/6281111111111"));
        assert!(policy.is_owner("6282222222222@s.whatsapp.net"));
        assert!(policy.is_owner("@6282222222222"));
        assert!(!policy.is_owner("6289999999999@s.whatsapp.net"));
        assert!(!policy.is_owner(""));
    }

    #[test]
    fn test_prefix_resolution() {
        let policy = Policy::new(BotSettings::default(), &owner());
        assert_eq!(policy.prefix(), ".");

        let fallback = policy.with_prefix("");
        assert_eq!(fallback.prefix(), "!");

        let disabled = Policy::new(
            BotSettings {
                prefix_enabled: false,
                ..BotSettings::default()
            },
            &owner(),
        );
        assert_eq!(disabled.prefix(), "");
    }

    #[test]
    fn test_update_swaps_and_persists() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let defaults = BotSettings::default();
        let store = SettingsStore::open(&path, &defaults, &GroupDefaults::default());

        let handle = PolicyHandle::load(&defaults, &owner(), &store);
        let before = handle.snapshot();
        handle.update(&store, |p| p.with_prefix("#").with_public(false));

        assert_eq!(before.prefix(), ".");
        assert_eq!(handle.snapshot().prefix(), "#");
        assert!(!handle.snapshot().is_public());

        let reloaded = PolicyHandle::load(&defaults, &owner(), &SettingsStore::open(&path, &defaults, &GroupDefaults::default()));
        assert_eq!(reloaded.snapshot().prefix(), "#");
        assert!(!reloaded.snapshot().is_public());
    }

    #[test]
    fn test_with_settings_keeps_owners() {
        let policy = Policy::new(BotSettings::default(), &owner()).with_prefix("#").with_public(false);
        let restored = policy.with_settings(BotSettings::default());

        assert_eq!(restored.prefix(), ".");
        assert!(restored.is_public());
        assert!(restored.is_owner("6281111111111@s.whatsapp.net"));
    }
}
