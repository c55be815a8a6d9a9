use serde::{Deserialize, Serialize};

use super::TreeEntity;
use crate::domain::value_objects::{
    catalog::{AddMovieModel, EditMovieModel},
    enums::{content_statuses::ContentStatus, content_types::ContentType},
    fields::non_blank,
};

pub const MOVIES_PATH: &str = "movies";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovieEntity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub genre: String,
    pub duration: String,
    pub rating: f64,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub views: u64,
    pub revenue: f64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl TreeEntity for MovieEntity {
    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// Payload written when a movie is created. Counters always start at zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertMovieEntity {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub duration: String,
    pub rating: f64,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub views: u64,
    pub revenue: f64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl InsertMovieEntity {
    pub fn new(model: AddMovieModel, created_by: Option<String>, now: i64) -> Self {
        Self {
            title: model.title,
            description: model.description,
            genre: model.genre,
            duration: model.duration,
            rating: model.rating,
            poster: model.poster,
            video_url: non_blank(model.video_url),
            content_type: model.content_type,
            status: model.status,
            views: 0,
            revenue: 0.0,
            created_at: now,
            updated_at: now,
            created_by: non_blank(created_by),
        }
    }
}

/// Partial payload merged into an existing movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMovieEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,
    pub updated_at: i64,
}

impl EditMovieEntity {
    pub fn new(changes: EditMovieModel, now: i64) -> Self {
        Self {
            title: non_blank(changes.title),
            description: non_blank(changes.description),
            genre: non_blank(changes.genre),
            duration: non_blank(changes.duration),
            rating: changes.rating,
            poster: non_blank(changes.poster),
            video_url: non_blank(changes.video_url),
            content_type: changes.content_type,
            status: changes.status,
            updated_at: now,
        }
    }
}
