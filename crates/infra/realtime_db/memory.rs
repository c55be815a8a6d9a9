use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::realtime_tree::RealtimeTree;

/// In-process tree with the same read/write semantics as the remote database.
/// Used for local runs and tests.
#[derive(Default)]
pub struct MemoryTree {
    root: RwLock<Value>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Value) -> Self {
        Self {
            root: RwLock::new(data),
        }
    }

    pub async fn snapshot(&self) -> Value {
        self.root.read().await.clone()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

fn node_mut<'a>(root: &'a mut Value, segments: &[&str]) -> &'a mut Value {
    let mut node = root;
    for segment in segments {
        node = ensure_object(node)
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }
    node
}

fn remove_at(root: &mut Value, segments: &[&str]) {
    let Some((last, parents)) = segments.split_last() else {
        *root = Value::Null;
        return;
    };

    let parent = parents
        .iter()
        .try_fold(root, |node, segment| node.get_mut(*segment));
    if let Some(Value::Object(map)) = parent {
        map.remove(*last);
    }
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[async_trait]
impl RealtimeTree for MemoryTree {
    async fn read(&self, path: &str) -> Result<Option<Value>> {
        let root = self.root.read().await;
        let found = segments(path)
            .into_iter()
            .try_fold(&*root, |node, segment| node.get(segment));

        Ok(found.filter(|value| !is_absent(value)).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<()> {
        let segments = segments(path);
        let mut root = self.root.write().await;

        if is_absent(&value) {
            remove_at(&mut root, &segments);
        } else {
            *node_mut(&mut root, &segments) = value;
        }
        Ok(())
    }

    async fn merge(&self, path: &str, fields: Value) -> Result<()> {
        let Value::Object(fields) = fields else {
            bail!("merge at `{path}` expects an object");
        };

        let segments = segments(path);
        let mut root = self.root.write().await;
        let target = ensure_object(node_mut(&mut root, &segments));
        for (key, value) in fields {
            if value.is_null() {
                target.remove(&key);
            } else {
                target.insert(key, value);
            }
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let segments = segments(path);
        let mut root = self.root.write().await;
        remove_at(&mut root, &segments);
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String> {
        let key = format!("-{}", Uuid::new_v4().simple());
        let child = format!("{}/{key}", path.trim_matches('/'));

        let mut root = self.root.write().await;
        *node_mut(&mut root, &segments(&child)) = value;
        Ok(key)
    }
}
