use std::sync::Arc;

use storefront_core::domain::{
    entities::{slides::SlideEntity, updates::UpdateItemEntity},
    repositories::{
        slides::SlideRepository, updates::UpdateItemRepository, users::UserRepository,
    },
    value_objects::home_content::{
        AddSlideModel, AddUpdateItemModel, EditSlideModel, EditUpdateItemModel,
    },
};
use tracing::{error, info};

use super::{
    access::AccessControl,
    errors::{ContentError, UseCaseResult},
};

/// Hero carousel slides on the home page.
pub struct SlidesUseCase<S, U>
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    slide_repo: Arc<S>,
    access: AccessControl<U>,
}

impl<S, U> SlidesUseCase<S, U>
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(slide_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            slide_repo,
            access: AccessControl::new(user_repo),
        }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<SlideEntity>> {
        self.slide_repo.get_all().await.map_err(|err| {
            error!(db_error = ?err, "home: failed to list slides");
            ContentError::from(err)
        })
    }

    pub async fn get(&self, id: &str) -> UseCaseResult<SlideEntity> {
        self.slide_repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound("Slide"))
    }

    pub async fn add(&self, actor_uid: &str, slide: AddSlideModel) -> UseCaseResult<String> {
        self.access.require_admin(actor_uid).await?;

        if slide.image_url.trim().is_empty() {
            return Err(ContentError::Invalid("Image URL is required".to_string()));
        }

        let id = self.slide_repo.add(slide).await.map_err(|err| {
            error!(db_error = ?err, "home: failed to add slide");
            ContentError::from(err)
        })?;

        info!(%id, actor_uid, "home: slide added");
        Ok(id)
    }

    pub async fn update(
        &self,
        actor_uid: &str,
        id: &str,
        changes: EditSlideModel,
    ) -> UseCaseResult<SlideEntity> {
        self.access.require_admin(actor_uid).await?;

        self.get(id).await?;
        self.slide_repo.update(id, changes).await.map_err(|err| {
            error!(db_error = ?err, id, "home: failed to update slide");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "home: slide updated");
        self.get(id).await
    }

    pub async fn delete(&self, actor_uid: &str, id: &str) -> UseCaseResult<()> {
        self.access.require_admin(actor_uid).await?;

        self.slide_repo.delete(id).await.map_err(|err| {
            error!(db_error = ?err, id, "home: failed to delete slide");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "home: slide deleted");
        Ok(())
    }
}

/// "What's new" items on the home page.
pub struct UpdatesUseCase<R, U>
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    update_repo: Arc<R>,
    access: AccessControl<U>,
}

impl<R, U> UpdatesUseCase<R, U>
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(update_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        Self {
            update_repo,
            access: AccessControl::new(user_repo),
        }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<UpdateItemEntity>> {
        self.update_repo.get_all().await.map_err(|err| {
            error!(db_error = ?err, "home: failed to list updates");
            ContentError::from(err)
        })
    }

    pub async fn get(&self, id: &str) -> UseCaseResult<UpdateItemEntity> {
        self.update_repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound("Update"))
    }

    pub async fn add(&self, actor_uid: &str, item: AddUpdateItemModel) -> UseCaseResult<String> {
        self.access.require_admin(actor_uid).await?;

        if item.title.trim().is_empty() {
            return Err(ContentError::Invalid("Title is required".to_string()));
        }

        let id = self.update_repo.add(item).await.map_err(|err| {
            error!(db_error = ?err, "home: failed to add update");
            ContentError::from(err)
        })?;

        info!(%id, actor_uid, "home: update added");
        Ok(id)
    }

    pub async fn update(
        &self,
        actor_uid: &str,
        id: &str,
        changes: EditUpdateItemModel,
    ) -> UseCaseResult<UpdateItemEntity> {
        self.access.require_admin(actor_uid).await?;

        self.get(id).await?;
        self.update_repo.update(id, changes).await.map_err(|err| {
            error!(db_error = ?err, id, "home: failed to edit update");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "home: update edited");
        self.get(id).await
    }

    pub async fn delete(&self, actor_uid: &str, id: &str) -> UseCaseResult<()> {
        self.access.require_admin(actor_uid).await?;

        self.update_repo.delete(id).await.map_err(|err| {
            error!(db_error = ?err, id, "home: failed to delete update");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "home: update deleted");
        Ok(())
    }
}
