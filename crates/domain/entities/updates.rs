use serde::{Deserialize, Serialize};

use super::TreeEntity;
use crate::domain::value_objects::{
    fields::non_blank,
    home_content::{AddUpdateItemModel, EditUpdateItemModel},
};

pub const UPDATES_PATH: &str = "updates";

/// News / announcement entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateItemEntity {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TreeEntity for UpdateItemEntity {
    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertUpdateItemEntity {
    pub title: String,
    pub body: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InsertUpdateItemEntity {
    pub fn new(model: AddUpdateItemModel, now: i64) -> Self {
        Self {
            title: model.title,
            body: model.body,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUpdateItemEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub updated_at: i64,
}

impl EditUpdateItemEntity {
    pub fn new(changes: EditUpdateItemModel, now: i64) -> Self {
        Self {
            title: non_blank(changes.title),
            body: non_blank(changes.body),
            updated_at: now,
        }
    }
}
