use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{
    entities::users::{EditUserEntity, InsertUserEntity, USERS_PATH, UserEntity},
    repositories::{
        data_access_error::DataAccessResult, realtime_tree::RealtimeTree, users::UserRepository,
    },
    value_objects::{
        enums::user_roles::UserRole,
        users::{CreateProfileModel, EditUserModel},
    },
};
use crate::infra::realtime_db::collection;

pub struct UserRealtimeDb {
    tree: Arc<dyn RealtimeTree>,
}

impl UserRealtimeDb {
    pub fn new(tree: Arc<dyn RealtimeTree>) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl UserRepository for UserRealtimeDb {
    async fn get_all(&self) -> DataAccessResult<Vec<UserEntity>> {
        collection::read_all_newest_first(self.tree.as_ref(), USERS_PATH).await
    }

    async fn get_by_id(&self, uid: &str) -> DataAccessResult<Option<UserEntity>> {
        collection::read_one(self.tree.as_ref(), USERS_PATH, uid).await
    }

    async fn create_profile(
        &self,
        uid: &str,
        profile: CreateProfileModel,
        role: UserRole,
    ) -> DataAccessResult<UserEntity> {
        let entity = InsertUserEntity::new(profile, role, collection::now_millis());
        collection::put(self.tree.as_ref(), USERS_PATH, uid, &entity).await?;

        Ok(UserEntity {
            id: uid.to_string(),
            name: entity.name,
            email: entity.email,
            role: entity.role,
            subscription: None,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            last_active: entity.last_active,
            status: entity.status,
        })
    }

    async fn update(&self, uid: &str, changes: EditUserModel) -> DataAccessResult<()> {
        let entity = EditUserEntity::new(changes, collection::now_millis());
        collection::merge(self.tree.as_ref(), USERS_PATH, uid, entity).await
    }

    async fn touch_last_active(&self, uid: &str) -> DataAccessResult<()> {
        let changes = json!({ "lastActive": collection::now_millis() });
        collection::merge(self.tree.as_ref(), USERS_PATH, uid, changes).await
    }

    async fn delete(&self, uid: &str) -> DataAccessResult<()> {
        collection::remove(self.tree.as_ref(), USERS_PATH, uid).await
    }
}
