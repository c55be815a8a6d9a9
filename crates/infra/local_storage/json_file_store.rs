use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::domain::{repositories::local_store::LocalStore, value_objects::fields::is_valid_key};

/// One JSON document per key under a root directory. `a/b` lives at `a/b.json`.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        let mut segments = key.split('/').peekable();

        while let Some(segment) = segments.next() {
            if !is_valid_key(segment) {
                bail!("invalid local store key `{key}`");
            }
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}.json"));
            }
        }

        Ok(path)
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.file_for(key)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let value = serde_json::from_slice(&raw)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        Ok(Some(value))
    }

    async fn save(&self, key: &str, value: Value) -> Result<()> {
        let path = self.file_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        // Write to a sibling file first so a crash never leaves half a document.
        let staging = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(&value)?;
        fs::write(&staging, bytes)
            .await
            .with_context(|| format!("failed to write {}", staging.display()))?;
        fs::rename(&staging, &path)
            .await
            .with_context(|| format!("failed to replace {}", path.display()))?;

        debug!(key, "local store: saved");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.file_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to delete {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn saved_documents_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store
            .save("uid-1/cart", json!([{ "contentId": "m1", "quantity": 2 }]))
            .await
            .unwrap();

        assert_eq!(
            store.load("uid-1/cart").await.unwrap(),
            Some(json!([{ "contentId": "m1", "quantity": 2 }]))
        );
        assert!(dir.path().join("uid-1").join("cart.json").exists());
    }

    #[tokio::test]
    async fn missing_documents_load_as_none_and_delete_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert_eq!(store.load("uid-1/wishlist").await.unwrap(), None);
        store.delete("uid-1/wishlist").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(store.load("../etc/passwd").await.is_err());
        assert!(store.save("uid-1//cart", json!([])).await.is_err());
    }
}
