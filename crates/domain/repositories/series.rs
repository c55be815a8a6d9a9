use async_trait::async_trait;
use mockall::automock;

use super::data_access_error::DataAccessResult;
use crate::domain::{
    entities::series::{EpisodeEntity, SeriesEntity},
    value_objects::catalog::{AddEpisodeModel, AddSeriesModel, EditSeriesModel},
};

#[automock]
#[async_trait]
pub trait SeriesRepository: Send + Sync {
    async fn get_all(&self) -> DataAccessResult<Vec<SeriesEntity>>;
    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<SeriesEntity>>;
    async fn add(&self, series: AddSeriesModel) -> DataAccessResult<String>;
    async fn update(&self, id: &str, changes: EditSeriesModel) -> DataAccessResult<()>;
    /// Episodes go with it.
    async fn delete(&self, id: &str) -> DataAccessResult<()>;

    /// Ascending by episode number.
    async fn get_episodes(&self, series_id: &str) -> DataAccessResult<Vec<EpisodeEntity>>;
    async fn add_episode(
        &self,
        series_id: &str,
        episode: AddEpisodeModel,
    ) -> DataAccessResult<String>;
    async fn delete_episode(&self, series_id: &str, episode_id: &str) -> DataAccessResult<()>;
}
