use std::sync::Arc;

use dashmap::DashMap;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const ONBOARDED_PATIENT_KEY: &str = "onboardedPatient";
pub const ONBOARDED_PROVIDER_KEY: &str = "onboardedProvider";

/// String key/value store that survives between requests of one browser.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);

    /// Reads a key and removes it in one step.
    fn take(&self, key: &str) -> Option<String> {
        let value = self.get(key);
        self.remove(key);
        value
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn take(&self, key: &str) -> Option<String> {
        self.entries.remove(key).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_removes_the_entry() {
        let storage = MemoryStorage::new();
        storage.set(ONBOARDED_PATIENT_KEY, "{}".into());
        assert_eq!(storage.take(ONBOARDED_PATIENT_KEY).as_deref(), Some("{}"));
        assert!(storage.get(ONBOARDED_PATIENT_KEY).is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        other.set(TOKEN_KEY, "abc".into());
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
    }
}
