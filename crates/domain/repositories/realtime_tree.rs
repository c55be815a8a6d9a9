use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

/// Raw access to the shared hierarchical key-value tree.
///
/// Paths are `/`-separated without leading or trailing slashes. Absent data
/// reads as `None`; writes are last-write-wins.
#[automock]
#[async_trait]
pub trait RealtimeTree: Send + Sync {
    async fn read(&self, path: &str) -> Result<Option<Value>>;

    /// Replaces whatever is stored at `path`.
    async fn set(&self, path: &str, value: Value) -> Result<()>;

    /// Shallow merge of the object's fields into `path`.
    async fn merge(&self, path: &str, fields: Value) -> Result<()>;

    /// Deletes `path` and everything nested under it.
    async fn remove(&self, path: &str) -> Result<()>;

    /// Appends `value` under a freshly generated child key and returns that key.
    async fn push(&self, path: &str, value: Value) -> Result<String>;
}
