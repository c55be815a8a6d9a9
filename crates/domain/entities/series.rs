use serde::{Deserialize, Serialize};

use super::TreeEntity;
use crate::domain::value_objects::{
    catalog::{AddEpisodeModel, AddSeriesModel, EditSeriesModel},
    enums::content_statuses::ContentStatus,
    fields::non_blank,
};

pub const SERIES_PATH: &str = "series";
pub const EPISODES_KEY: &str = "episodes";

pub fn episodes_path(series_id: &str) -> String {
    format!("{SERIES_PATH}/{series_id}/{EPISODES_KEY}")
}

/// Series header. The nested `episodes` subtree is read separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesEntity {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub status: ContentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TreeEntity for SeriesEntity {
    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSeriesEntity {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    pub status: ContentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl InsertSeriesEntity {
    pub fn new(model: AddSeriesModel, now: i64) -> Self {
        Self {
            title: model.title,
            description: model.description,
            poster: non_blank(model.poster),
            status: model.status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSeriesEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
    pub updated_at: i64,
}

impl EditSeriesEntity {
    pub fn new(changes: EditSeriesModel, now: i64) -> Self {
        Self {
            title: non_blank(changes.title),
            description: non_blank(changes.description),
            poster: non_blank(changes.poster),
            status: changes.status,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EpisodeEntity {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    pub duration: String,
    pub episode_number: u32,
    pub created_at: i64,
}

impl TreeEntity for EpisodeEntity {
    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertEpisodeEntity {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    pub duration: String,
    pub episode_number: u32,
    pub created_at: i64,
}

impl InsertEpisodeEntity {
    pub fn new(model: AddEpisodeModel, now: i64) -> Self {
        Self {
            title: model.title,
            description: non_blank(model.description),
            video_url: model.video_url,
            duration: model.duration,
            episode_number: model.episode_number,
            created_at: now,
        }
    }
}
