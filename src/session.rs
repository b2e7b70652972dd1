use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::error::Result;
use crate::types::Payload;

/// Namespace the transport reads the auth token from.
pub const SESSION_NAMESPACE: &str = "session";
/// Key of the auth token inside [`SESSION_NAMESPACE`].
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Namespaced key/value store for client-side state (session, credentials,
/// account details). Values are arbitrary JSON.
///
/// Backed by `session.json` under the data directory so a client keeps its
/// session across restarts, or purely in-memory via [`SessionStore::in_memory`].
pub struct SessionStore {
    data: DashMap<String, Payload>,
    file_path: Option<PathBuf>,
}

impl SessionStore {
    /// Store without persistence. State is gone when the process exits.
    pub fn in_memory() -> Self {
        Self {
            data: DashMap::new(),
            file_path: None,
        }
    }

    /// Load `{data_dir}/session.json`, or start empty if it is missing or
    /// unreadable.
    pub fn load_or_create(data_dir: &Path) -> Self {
        let file_path = data_dir.join("session.json");
        let data = DashMap::new();

        if file_path.exists() {
            match std::fs::read_to_string(&file_path) {
                Ok(content) => match serde_json::from_str::<BTreeMap<String, Payload>>(&content) {
                    Ok(namespaces) => {
                        for (namespace, values) in namespaces {
                            data.insert(namespace, values);
                        }
                        tracing::info!("[session] loaded {} namespace(s)", data.len());
                    }
                    Err(e) => {
                        tracing::warn!("[session] failed to parse session.json: {}, starting empty", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("[session] failed to read session.json: {}, starting empty", e);
                }
            }
        }

        Self {
            data,
            file_path: Some(file_path),
        }
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<serde_json::Value> {
        self.data.get(namespace).and_then(|ns| ns.get(key).cloned())
    }

    pub fn set(&self, namespace: &str, key: &str, value: serde_json::Value) {
        {
            let mut ns = self.data.entry(namespace.to_string()).or_default();
            ns.insert(key.to_string(), value);
        }
        self.save();
    }

    pub fn remove(&self, namespace: &str, key: &str) -> Option<serde_json::Value> {
        let removed = self
            .data
            .get_mut(namespace)
            .and_then(|mut ns| ns.remove(key));
        if removed.is_some() {
            self.save();
        }
        removed
    }

    /// The stored auth token, when it is a string.
    pub fn auth_token(&self) -> Option<String> {
        self.get(SESSION_NAMESPACE, AUTH_TOKEN_KEY)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Write the store to disk now. No-op for in-memory stores.
    pub fn persist(&self) -> Result<()> {
        let path = match &self.file_path {
            Some(path) => path,
            None => return Ok(()),
        };

        let snapshot: BTreeMap<String, Payload> = self
            .data
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let json = serde_json::to_string_pretty(&snapshot)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    fn save(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!("[session] failed to save session.json: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_set_get_remove() {
        let store = SessionStore::in_memory();

        assert_eq!(store.get("session", "authToken"), None);

        store.set("session", "authToken", json!("abc123"));
        assert_eq!(store.get("session", "authToken"), Some(json!("abc123")));
        assert_eq!(store.auth_token().as_deref(), Some("abc123"));

        assert_eq!(store.remove("session", "authToken"), Some(json!("abc123")));
        assert_eq!(store.get("session", "authToken"), None);
        assert_eq!(store.auth_token(), None);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = SessionStore::in_memory();

        store.set("session", "accountID", json!(42));
        store.set("prefs", "accountID", json!(99));

        assert_eq!(store.get("session", "accountID"), Some(json!(42)));
        assert_eq!(store.get("prefs", "accountID"), Some(json!(99)));
    }

    #[test]
    fn test_survives_reload() {
        let temp_dir = tempfile::tempdir().unwrap();

        let store = SessionStore::load_or_create(temp_dir.path());
        store.set("session", "authToken", json!("persisted-token"));
        store.set("session", "accountID", json!(7));

        let reloaded = SessionStore::load_or_create(temp_dir.path());
        assert_eq!(reloaded.auth_token().as_deref(), Some("persisted-token"));
        assert_eq!(reloaded.get("session", "accountID"), Some(json!(7)));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("session.json"), b"not json").unwrap();

        let store = SessionStore::load_or_create(temp_dir.path());
        assert_eq!(store.auth_token(), None);

        // A corrupt file is replaced on the next write.
        store.set("session", "authToken", json!("fresh"));
        let reloaded = SessionStore::load_or_create(temp_dir.path());
        assert_eq!(reloaded.auth_token().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_in_memory_persist_is_a_noop() {
        let store = SessionStore::in_memory();
        store.set("session", "authToken", json!("x"));
        store.persist().unwrap();
    }
}
