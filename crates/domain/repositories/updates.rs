use async_trait::async_trait;
use mockall::automock;

use super::data_access_error::DataAccessResult;
use crate::domain::{
    entities::updates::UpdateItemEntity,
    value_objects::home_content::{AddUpdateItemModel, EditUpdateItemModel},
};

#[automock]
#[async_trait]
pub trait UpdateItemRepository: Send + Sync {
    async fn get_all(&self) -> DataAccessResult<Vec<UpdateItemEntity>>;
    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<UpdateItemEntity>>;
    async fn add(&self, item: AddUpdateItemModel) -> DataAccessResult<String>;
    async fn update(&self, id: &str, changes: EditUpdateItemModel) -> DataAccessResult<()>;
    async fn delete(&self, id: &str) -> DataAccessResult<()>;
}
