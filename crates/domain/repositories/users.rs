use async_trait::async_trait;
use mockall::automock;

use super::data_access_error::DataAccessResult;
use crate::domain::{
    entities::users::UserEntity,
    value_objects::{
        enums::user_roles::UserRole,
        users::{CreateProfileModel, EditUserModel},
    },
};

#[automock]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_all(&self) -> DataAccessResult<Vec<UserEntity>>;
    async fn get_by_id(&self, uid: &str) -> DataAccessResult<Option<UserEntity>>;
    /// Writes the profile at the identity provider's uid.
    async fn create_profile(
        &self,
        uid: &str,
        profile: CreateProfileModel,
        role: UserRole,
    ) -> DataAccessResult<UserEntity>;
    async fn update(&self, uid: &str, changes: EditUserModel) -> DataAccessResult<()>;
    async fn touch_last_active(&self, uid: &str) -> DataAccessResult<()>;
    async fn delete(&self, uid: &str) -> DataAccessResult<()>;
}
