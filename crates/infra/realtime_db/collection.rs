//! Shared read/write helpers for collections stored as key/value maps.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    entities::TreeEntity,
    repositories::{
        data_access_error::{DataAccessError, DataAccessResult},
        realtime_tree::RealtimeTree,
    },
    value_objects::fields::is_valid_key,
};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn validate_key(key: &str) -> DataAccessResult<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(DataAccessError::InvalidKey(key.to_string()))
    }
}

pub fn child_path(collection: &str, key: &str) -> DataAccessResult<String> {
    validate_key(key)?;
    Ok(format!("{collection}/{key}"))
}

fn encode(path: &str, payload: impl Serialize) -> DataAccessResult<Value> {
    serde_json::to_value(payload).map_err(|err| DataAccessError::write(path, err.into()))
}

/// Reads every child of `path` in one round trip. Children that do not decode
/// are skipped so one malformed record cannot hide the rest.
pub async fn read_all<T: TreeEntity>(
    tree: &dyn RealtimeTree,
    path: &str,
) -> DataAccessResult<Vec<T>> {
    let Some(value) = tree
        .read(path)
        .await
        .map_err(|err| DataAccessError::fetch(path, err))?
    else {
        return Ok(Vec::new());
    };

    let children: Vec<(String, Value)> = match value {
        Value::Object(map) => map.into_iter().collect(),
        // The service returns sequential integer keys as an array.
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        other => {
            return Err(DataAccessError::Decode {
                path: path.to_string(),
                reason: format!("expected a map of records, got `{other}`"),
            });
        }
    };

    let mut records = Vec::with_capacity(children.len());
    for (key, child) in children {
        match serde_json::from_value::<T>(child) {
            Ok(mut record) => {
                record.assign_id(key);
                records.push(record);
            }
            Err(err) => {
                warn!(path, %key, error = %err, "realtime db: skipping undecodable record");
            }
        }
    }

    Ok(records)
}

/// `read_all` ordered newest first by `createdAt`.
pub async fn read_all_newest_first<T: TreeEntity>(
    tree: &dyn RealtimeTree,
    path: &str,
) -> DataAccessResult<Vec<T>> {
    let mut records = read_all::<T>(tree, path).await?;
    records.sort_by_key(|record| std::cmp::Reverse(record.created_at()));
    Ok(records)
}

pub async fn read_one<T: TreeEntity>(
    tree: &dyn RealtimeTree,
    collection: &str,
    id: &str,
) -> DataAccessResult<Option<T>> {
    let path = child_path(collection, id)?;
    let Some(value) = tree
        .read(&path)
        .await
        .map_err(|err| DataAccessError::fetch(&path, err))?
    else {
        return Ok(None);
    };

    let mut record = serde_json::from_value::<T>(value).map_err(|err| DataAccessError::Decode {
        path: path.clone(),
        reason: err.to_string(),
    })?;
    record.assign_id(id.to_string());
    Ok(Some(record))
}

/// Appends under a generated key and returns it.
pub async fn append(
    tree: &dyn RealtimeTree,
    path: &str,
    payload: impl Serialize,
) -> DataAccessResult<String> {
    let value = encode(path, payload)?;
    tree.push(path, value)
        .await
        .map_err(|err| DataAccessError::write(path, err))
}

pub async fn put(
    tree: &dyn RealtimeTree,
    collection: &str,
    id: &str,
    payload: impl Serialize,
) -> DataAccessResult<()> {
    let path = child_path(collection, id)?;
    let value = encode(&path, payload)?;
    tree.set(&path, value)
        .await
        .map_err(|err| DataAccessError::write(&path, err))
}

pub async fn merge(
    tree: &dyn RealtimeTree,
    collection: &str,
    id: &str,
    changes: impl Serialize,
) -> DataAccessResult<()> {
    let path = child_path(collection, id)?;
    let value = encode(&path, changes)?;
    tree.merge(&path, value)
        .await
        .map_err(|err| DataAccessError::write(&path, err))
}

pub async fn remove(tree: &dyn RealtimeTree, collection: &str, id: &str) -> DataAccessResult<()> {
    let path = child_path(collection, id)?;
    tree.remove(&path)
        .await
        .map_err(|err| DataAccessError::write(&path, err))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::domain::repositories::realtime_tree::MockRealtimeTree;
    use crate::infra::realtime_db::memory::MemoryTree;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Note {
        id: String,
        title: String,
        created_at: i64,
    }

    impl TreeEntity for Note {
        fn assign_id(&mut self, id: String) {
            self.id = id;
        }

        fn created_at(&self) -> i64 {
            self.created_at
        }
    }

    #[tokio::test]
    async fn newest_first_with_missing_timestamps_last() {
        let tree = MemoryTree::with_data(json!({
            "notes": {
                "a": { "title": "a", "createdAt": 100 },
                "b": { "title": "b", "createdAt": 300 },
                "c": { "title": "c" },
                "d": { "title": "d", "createdAt": 200 }
            }
        }));

        let notes = read_all_newest_first::<Note>(&tree, "notes").await.unwrap();

        let ids: Vec<&str> = notes.iter().map(|note| note.id.as_str()).collect();
        assert_eq!(ids, ["b", "d", "a", "c"]);
    }

    #[tokio::test]
    async fn undecodable_children_are_skipped() {
        let tree = MemoryTree::with_data(json!({
            "notes": {
                "good": { "title": "ok", "createdAt": 1 },
                "bad": { "title": 42 },
                "scalar": "oops"
            }
        }));

        let notes = read_all::<Note>(&tree, "notes").await.unwrap();

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "good");
    }

    #[tokio::test]
    async fn array_shaped_collections_use_indices_as_keys() {
        let mut tree = MockRealtimeTree::new();
        tree.expect_read()
            .returning(|_| Ok(Some(json!([null, { "title": "one" }, { "title": "two" }]))));

        let notes = read_all::<Note>(&tree, "notes").await.unwrap();

        let ids: Vec<&str> = notes.iter().map(|note| note.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[tokio::test]
    async fn read_failure_carries_the_path() {
        let mut tree = MockRealtimeTree::new();
        tree.expect_read()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let err = read_all::<Note>(&tree, "notes").await.unwrap_err();

        assert!(matches!(err, DataAccessError::Fetch { ref path, .. } if path == "notes"));
        assert_eq!(
            std::error::Error::source(&err).map(|source| source.to_string()),
            Some("connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn invalid_keys_never_reach_the_tree() {
        let tree = MockRealtimeTree::new();

        for key in ["", "a/b", "a.b", "a#b", "a$b", "a[b", "a]b"] {
            let err = read_one::<Note>(&tree, "notes", key).await.unwrap_err();
            assert!(matches!(err, DataAccessError::InvalidKey(_)));
            let err = remove(&tree, "notes", key).await.unwrap_err();
            assert!(matches!(err, DataAccessError::InvalidKey(_)));
        }
    }
}
