use serde::Deserialize;

use super::enums::{content_statuses::ContentStatus, content_types::ContentType};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieModel {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub status: ContentStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditMovieModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<String>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
    pub video_url: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddSeriesModel {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub status: ContentStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditSeriesModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddEpisodeModel {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub video_url: String,
    #[serde(default)]
    pub duration: String,
    pub episode_number: u32,
}

/// Rating bounds shared by movie writes.
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)
}
