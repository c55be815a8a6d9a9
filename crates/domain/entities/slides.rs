use serde::{Deserialize, Serialize};

use super::TreeEntity;
use crate::domain::value_objects::{
    fields::non_blank,
    home_content::{AddSlideModel, EditSlideModel},
};

pub const SLIDES_PATH: &str = "slides";

/// Homepage carousel entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlideEntity {
    pub id: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TreeEntity for SlideEntity {
    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSlideEntity {
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InsertSlideEntity {
    pub fn new(model: AddSlideModel, now: i64) -> Self {
        Self {
            image_url: model.image_url,
            caption: non_blank(model.caption),
            link: non_blank(model.link),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSlideEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub updated_at: i64,
}

impl EditSlideEntity {
    pub fn new(changes: EditSlideModel, now: i64) -> Self {
        Self {
            image_url: non_blank(changes.image_url),
            caption: non_blank(changes.caption),
            link: non_blank(changes.link),
            updated_at: now,
        }
    }
}
