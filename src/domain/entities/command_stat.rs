use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage counters for one command name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStat {
    pub count: u64,
    pub success: u64,
    pub failed: u64,
    /// Invocations per user id
    pub users: BTreeMap<String, u64>,
}

impl CommandStat {
    pub fn record(&mut self, user_id: &str, success: bool) {
        self.count += 1;
        if success {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        *self.users.entry(user_id.to_string()).or_insert(0) += 1;
    }
}
