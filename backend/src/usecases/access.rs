use std::sync::Arc;

use storefront_core::domain::{
    entities::users::UserEntity, repositories::users::UserRepository,
    value_objects::enums::user_statuses::UserStatus,
};
use tracing::{error, warn};

use super::errors::{ContentError, UseCaseResult};

/// Admin checks against the role stored in the `users` collection. The role
/// is read on every call so a demotion takes effect immediately.
pub struct AccessControl<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> AccessControl<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn is_admin(&self, uid: &str) -> UseCaseResult<bool> {
        let profile = self.user_repo.get_by_id(uid).await.map_err(|err| {
            error!(db_error = ?err, uid, "access: failed to load profile");
            ContentError::from(err)
        })?;

        Ok(profile
            .map(|profile| profile.role.is_admin() && profile.status == UserStatus::Active)
            .unwrap_or(false))
    }

    pub async fn require_admin(&self, uid: &str) -> UseCaseResult<()> {
        if self.is_admin(uid).await? {
            Ok(())
        } else {
            warn!(uid, "access: admin action refused");
            Err(ContentError::Forbidden)
        }
    }

    pub async fn profile(&self, uid: &str) -> UseCaseResult<Option<UserEntity>> {
        Ok(self.user_repo.get_by_id(uid).await?)
    }
}
