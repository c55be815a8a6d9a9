use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddSlideModel {
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditSlideModel {
    pub image_url: Option<String>,
    pub caption: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AddUpdateItemModel {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EditUpdateItemModel {
    pub title: Option<String>,
    pub body: Option<String>,
}
