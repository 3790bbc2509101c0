//! In-memory settings store

use crate::error::Result;
use crate::settings_store::SettingsStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Settings kept in a process-local map. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given pairs
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.values.write().await.remove(name).is_some())
    }

    async fn list(&self) -> Result<Vec<(String, String)>> {
        let mut pairs: Vec<_> = self
            .values
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.get("section-api").await.unwrap(), None);

        store.set("section-api", "0.13").await.unwrap();
        assert_eq!(
            store.get("section-api").await.unwrap().as_deref(),
            Some("0.13")
        );

        store.set("section-api", "14").await.unwrap();
        assert_eq!(store.get("section-api").await.unwrap().as_deref(), Some("14"));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = MemorySettingsStore::with_values([("b", "2"), ("a", "1")]);

        assert_eq!(
            store.list().await.unwrap(),
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
