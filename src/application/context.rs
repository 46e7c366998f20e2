//! Shared state of one running bot

use std::sync::Arc;

use crate::application::fanout::{BackgroundTasks, FanOutLimits};
use crate::application::policy::PolicyHandle;
use crate::application::stores::Stores;
use crate::domain::traits::MessagingGateway;
use crate::infrastructure::config::Config;

/// Everything a command may touch: configuration, policy, stores, the
/// gateway and the background task set
pub struct BotContext {
    pub config: Config,
    pub policy: PolicyHandle,
    pub stores: Stores,
    pub gateway: Arc<dyn MessagingGateway>,
    pub tasks: BackgroundTasks,
}

impl BotContext {
    /// Open the stores under the configured directory and load the policy
    pub fn new(config: Config, gateway: Arc<dyn MessagingGateway>) -> Self {
        let stores = Stores::open(&config);
        let policy = PolicyHandle::load(&config.settings, &config.owner, &stores.settings);
        Self {
            config,
            policy,
            stores,
            gateway,
            tasks: BackgroundTasks::new(),
        }
    }

    pub fn fanout_limits(&self) -> FanOutLimits {
        FanOutLimits::from(&self.config.fanout)
    }
}
