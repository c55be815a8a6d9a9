use std::sync::Arc;

use storefront_core::domain::{
    entities::series::{EpisodeEntity, SeriesEntity},
    repositories::{series::SeriesRepository, users::UserRepository},
    value_objects::catalog::{AddEpisodeModel, AddSeriesModel, EditSeriesModel},
};
use tracing::{error, info};

use super::{
    access::AccessControl,
    errors::{ContentError, UseCaseResult},
};

pub struct SeriesUseCase<S, U>
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    series_repo: Arc<S>,
    access: AccessControl<U>,
}

impl<S, U> SeriesUseCase<S, U>
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(series_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            series_repo,
            access: AccessControl::new(user_repo),
        }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<SeriesEntity>> {
        self.series_repo.get_all().await.map_err(|err| {
            error!(db_error = ?err, "catalog: failed to list series");
            ContentError::from(err)
        })
    }

    pub async fn get(&self, id: &str) -> UseCaseResult<SeriesEntity> {
        self.series_repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound("Series"))
    }

    pub async fn episodes(&self, series_id: &str) -> UseCaseResult<Vec<EpisodeEntity>> {
        self.get(series_id).await?;
        self.series_repo.get_episodes(series_id).await.map_err(|err| {
            error!(db_error = ?err, series_id, "catalog: failed to list episodes");
            ContentError::from(err)
        })
    }

    pub async fn add(&self, actor_uid: &str, series: AddSeriesModel) -> UseCaseResult<String> {
        self.access.require_admin(actor_uid).await?;

        if series.title.trim().is_empty() {
            return Err(ContentError::Invalid("Title is required".to_string()));
        }

        let id = self.series_repo.add(series).await.map_err(|err| {
            error!(db_error = ?err, "catalog: failed to add series");
            ContentError::from(err)
        })?;

        info!(%id, actor_uid, "catalog: series added");
        Ok(id)
    }

    pub async fn update(
        &self,
        actor_uid: &str,
        id: &str,
        changes: EditSeriesModel,
    ) -> UseCaseResult<SeriesEntity> {
        self.access.require_admin(actor_uid).await?;

        self.get(id).await?;
        self.series_repo.update(id, changes).await.map_err(|err| {
            error!(db_error = ?err, id, "catalog: failed to update series");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "catalog: series updated");
        self.get(id).await
    }

    pub async fn delete(&self, actor_uid: &str, id: &str) -> UseCaseResult<()> {
        self.access.require_admin(actor_uid).await?;

        self.series_repo.delete(id).await.map_err(|err| {
            error!(db_error = ?err, id, "catalog: failed to delete series");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "catalog: series deleted with its episodes");
        Ok(())
    }

    pub async fn add_episode(
        &self,
        actor_uid: &str,
        series_id: &str,
        episode: AddEpisodeModel,
    ) -> UseCaseResult<String> {
        self.access.require_admin(actor_uid).await?;

        if episode.title.trim().is_empty() {
            return Err(ContentError::Invalid("Episode title is required".to_string()));
        }
        if episode.video_url.trim().is_empty() {
            return Err(ContentError::Invalid("Episode video URL is required".to_string()));
        }
        if episode.episode_number == 0 {
            return Err(ContentError::Invalid(
                "Episode number starts at 1".to_string(),
            ));
        }

        // Episodes never exist outside their series.
        self.get(series_id).await?;
        let id = self
            .series_repo
            .add_episode(series_id, episode)
            .await
            .map_err(|err| {
                error!(db_error = ?err, series_id, "catalog: failed to add episode");
                ContentError::from(err)
            })?;

        info!(%id, series_id, actor_uid, "catalog: episode added");
        Ok(id)
    }

    pub async fn delete_episode(
        &self,
        actor_uid: &str,
        series_id: &str,
        episode_id: &str,
    ) -> UseCaseResult<()> {
        self.access.require_admin(actor_uid).await?;

        self.series_repo
            .delete_episode(series_id, episode_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, series_id, episode_id, "catalog: failed to delete episode");
                ContentError::from(err)
            })?;

        info!(series_id, episode_id, actor_uid, "catalog: episode deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::domain::{
        entities::users::UserEntity,
        repositories::{series::MockSeriesRepository, users::MockUserRepository},
        value_objects::enums::user_roles::UserRole,
    };

    use super::*;

    fn admin_users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_get_by_id().returning(|uid| {
            Ok(Some(UserEntity {
                id: uid.to_string(),
                role: UserRole::Admin,
                ..Default::default()
            }))
        });
        users
    }

    fn episode(number: u32) -> AddEpisodeModel {
        AddEpisodeModel {
            title: format!("Episode {number}"),
            video_url: format!("https://cdn.luo.example/e{number}.mp4"),
            episode_number: number,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn episode_for_unknown_series_is_not_written() {
        let mut series = MockSeriesRepository::new();
        series.expect_get_by_id().returning(|_| Ok(None));
        series.expect_add_episode().never();
        let usecase = SeriesUseCase::new(Arc::new(series), Arc::new(admin_users()));

        let result = usecase.add_episode("uid_admin", "-Gone", episode(1)).await;

        assert!(matches!(result, Err(ContentError::NotFound("Series"))));
    }

    #[tokio::test]
    async fn episode_without_video_or_number_is_invalid() {
        let mut series = MockSeriesRepository::new();
        series.expect_add_episode().never();
        let usecase = SeriesUseCase::new(Arc::new(series), Arc::new(admin_users()));

        let mut no_video = episode(1);
        no_video.video_url = " ".to_string();

        assert!(matches!(
            usecase.add_episode("uid_admin", "-S1", no_video).await,
            Err(ContentError::Invalid(_))
        ));
        assert!(matches!(
            usecase.add_episode("uid_admin", "-S1", episode(0)).await,
            Err(ContentError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn episodes_are_listed_for_existing_series() {
        let mut series = MockSeriesRepository::new();
        series.expect_get_by_id().returning(|id| {
            Ok(Some(SeriesEntity {
                id: id.to_string(),
                title: "Sigana".to_string(),
                ..Default::default()
            }))
        });
        series
            .expect_get_episodes()
            .withf(|series_id| series_id == "-S1")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    EpisodeEntity {
                        id: "-E1".to_string(),
                        episode_number: 1,
                        ..Default::default()
                    },
                    EpisodeEntity {
                        id: "-E2".to_string(),
                        episode_number: 2,
                        ..Default::default()
                    },
                ])
            });
        let usecase = SeriesUseCase::new(Arc::new(series), Arc::new(MockUserRepository::new()));

        let episodes = usecase.episodes("-S1").await.unwrap();

        assert_eq!(
            episodes.iter().map(|e| e.episode_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
