use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemModel {
    pub content_id: String,
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddLibraryItemModel {
    pub content_id: String,
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
}

/// Watch history keeps only the most recent entries.
pub const MAX_WATCH_HISTORY: usize = 50;
