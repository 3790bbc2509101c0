use crate::error::Result;
use async_trait::async_trait;

/// Persistent string settings addressed by name.
///
/// Implementations must give read-after-write consistency: a `get` issued
/// after a completed `set` on the same store observes the new value.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value; `None` when it was never stored.
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    async fn set(&self, name: &str, value: &str) -> Result<()>;

    /// Remove a value. Returns whether anything was deleted.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// All stored `(name, value)` pairs ordered by name.
    async fn list(&self) -> Result<Vec<(String, String)>>;
}
