use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    entities::updates::{
        EditUpdateItemEntity, InsertUpdateItemEntity, UPDATES_PATH, UpdateItemEntity,
    },
    repositories::{
        data_access_error::DataAccessResult, realtime_tree::RealtimeTree,
        updates::UpdateItemRepository,
    },
    value_objects::home_content::{AddUpdateItemModel, EditUpdateItemModel},
};
use crate::infra::realtime_db::collection;

pub struct UpdateItemRealtimeDb {
    tree: Arc<dyn RealtimeTree>,
}

impl UpdateItemRealtimeDb {
    pub fn new(tree: Arc<dyn RealtimeTree>) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl UpdateItemRepository for UpdateItemRealtimeDb {
    async fn get_all(&self) -> DataAccessResult<Vec<UpdateItemEntity>> {
        collection::read_all_newest_first(self.tree.as_ref(), UPDATES_PATH).await
    }

    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<UpdateItemEntity>> {
        collection::read_one(self.tree.as_ref(), UPDATES_PATH, id).await
    }

    async fn add(&self, item: AddUpdateItemModel) -> DataAccessResult<String> {
        let entity = InsertUpdateItemEntity::new(item, collection::now_millis());
        collection::append(self.tree.as_ref(), UPDATES_PATH, entity).await
    }

    async fn update(&self, id: &str, changes: EditUpdateItemModel) -> DataAccessResult<()> {
        let entity = EditUpdateItemEntity::new(changes, collection::now_millis());
        collection::merge(self.tree.as_ref(), UPDATES_PATH, id, entity).await
    }

    async fn delete(&self, id: &str) -> DataAccessResult<()> {
        collection::remove(self.tree.as_ref(), UPDATES_PATH, id).await
    }
}
