use async_trait::async_trait;
use mockall::automock;

use super::data_access_error::DataAccessResult;
use crate::domain::{
    entities::slides::SlideEntity,
    value_objects::home_content::{AddSlideModel, EditSlideModel},
};

#[automock]
#[async_trait]
pub trait SlideRepository: Send + Sync {
    async fn get_all(&self) -> DataAccessResult<Vec<SlideEntity>>;
    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<SlideEntity>>;
    async fn add(&self, slide: AddSlideModel) -> DataAccessResult<String>;
    async fn update(&self, id: &str, changes: EditSlideModel) -> DataAccessResult<()>;
    async fn delete(&self, id: &str) -> DataAccessResult<()>;
}
