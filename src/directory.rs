//! Directory lookup contracts.
//!
//! The chat network knows users and channels by opaque ids; humans know them
//! by display names. [`Directory`] exposes both lookup directions for both
//! reference classes. A miss is never an error — callers degrade to literal
//! passthrough.

use std::collections::HashMap;

/// id⇄name lookups for users and channels.
pub trait Directory: Send + Sync {
    fn user_name(&self, id: &str) -> Option<String>;
    fn channel_name(&self, id: &str) -> Option<String>;
    fn user_id(&self, name: &str) -> Option<String>;
    fn channel_id(&self, name: &str) -> Option<String>;
}

/// Map-backed directory, built once from the id→name tables the connection
/// handshake provides (or from config for local runs).
#[derive(Debug, Default, Clone)]
pub struct StaticDirectory {
    users: HashMap<String, String>,
    channels: HashMap<String, String>,
    users_by_name: HashMap<String, String>,
    channels_by_name: HashMap<String, String>,
}

impl StaticDirectory {
    pub fn new(users: HashMap<String, String>, channels: HashMap<String, String>) -> Self {
        let users_by_name = users.iter().map(|(id, n)| (n.clone(), id.clone())).collect();
        let channels_by_name = channels
            .iter()
            .map(|(id, n)| (n.clone(), id.clone()))
            .collect();
        Self {
            users,
            channels,
            users_by_name,
            channels_by_name,
        }
    }

    /// Directory with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Directory for StaticDirectory {
    fn user_name(&self, id: &str) -> Option<String> {
        self.users.get(id).cloned()
    }

    fn channel_name(&self, id: &str) -> Option<String> {
        self.channels.get(id).cloned()
    }

    fn user_id(&self, name: &str) -> Option<String> {
        self.users_by_name.get(name).cloned()
    }

    fn channel_id(&self, name: &str) -> Option<String> {
        self.channels_by_name.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_work_both_directions() {
        let users = HashMap::from([("U1".to_string(), "alice".to_string())]);
        let channels = HashMap::from([("C1".to_string(), "general".to_string())]);
        let dir = StaticDirectory::new(users, channels);

        assert_eq!(dir.user_name("U1").as_deref(), Some("alice"));
        assert_eq!(dir.user_id("alice").as_deref(), Some("U1"));
        assert_eq!(dir.channel_name("C1").as_deref(), Some("general"));
        assert_eq!(dir.channel_id("general").as_deref(), Some("C1"));
        assert!(dir.user_name("U9").is_none());
    }
}
