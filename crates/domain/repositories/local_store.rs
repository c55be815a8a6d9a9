use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

/// Flat key/value store for client-side state. Values are whole JSON documents.
#[automock]
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Value>>;
    async fn save(&self, key: &str, value: Value) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
