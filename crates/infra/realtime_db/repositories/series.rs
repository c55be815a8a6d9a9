use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    entities::series::{
        EditSeriesEntity, EpisodeEntity, InsertEpisodeEntity, InsertSeriesEntity, SERIES_PATH,
        SeriesEntity, episodes_path,
    },
    repositories::{
        data_access_error::DataAccessResult, realtime_tree::RealtimeTree,
        series::SeriesRepository,
    },
    value_objects::catalog::{AddEpisodeModel, AddSeriesModel, EditSeriesModel},
};
use crate::infra::realtime_db::collection;

pub struct SeriesRealtimeDb {
    tree: Arc<dyn RealtimeTree>,
}

impl SeriesRealtimeDb {
    pub fn new(tree: Arc<dyn RealtimeTree>) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl SeriesRepository for SeriesRealtimeDb {
    async fn get_all(&self) -> DataAccessResult<Vec<SeriesEntity>> {
        collection::read_all_newest_first(self.tree.as_ref(), SERIES_PATH).await
    }

    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<SeriesEntity>> {
        collection::read_one(self.tree.as_ref(), SERIES_PATH, id).await
    }

    async fn add(&self, series: AddSeriesModel) -> DataAccessResult<String> {
        let entity = InsertSeriesEntity::new(series, collection::now_millis());
        collection::append(self.tree.as_ref(), SERIES_PATH, entity).await
    }

    async fn update(&self, id: &str, changes: EditSeriesModel) -> DataAccessResult<()> {
        let entity = EditSeriesEntity::new(changes, collection::now_millis());
        collection::merge(self.tree.as_ref(), SERIES_PATH, id, entity).await
    }

    async fn delete(&self, id: &str) -> DataAccessResult<()> {
        collection::remove(self.tree.as_ref(), SERIES_PATH, id).await
    }

    async fn get_episodes(&self, series_id: &str) -> DataAccessResult<Vec<EpisodeEntity>> {
        collection::validate_key(series_id)?;
        let mut episodes =
            collection::read_all::<EpisodeEntity>(self.tree.as_ref(), &episodes_path(series_id))
                .await?;
        episodes.sort_by_key(|episode| episode.episode_number);
        Ok(episodes)
    }

    async fn add_episode(
        &self,
        series_id: &str,
        episode: AddEpisodeModel,
    ) -> DataAccessResult<String> {
        collection::validate_key(series_id)?;
        let entity = InsertEpisodeEntity::new(episode, collection::now_millis());
        collection::append(self.tree.as_ref(), &episodes_path(series_id), entity).await
    }

    async fn delete_episode(&self, series_id: &str, episode_id: &str) -> DataAccessResult<()> {
        collection::validate_key(series_id)?;
        collection::remove(self.tree.as_ref(), &episodes_path(series_id), episode_id).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::repositories::data_access_error::DataAccessError;
    use crate::infra::realtime_db::memory::MemoryTree;

    fn episode(number: u32) -> AddEpisodeModel {
        AddEpisodeModel {
            title: format!("Episode {number}"),
            description: None,
            video_url: format!("https://cdn.example/e{number}.mp4"),
            duration: "45m".to_string(),
            episode_number: number,
        }
    }

    #[tokio::test]
    async fn episodes_are_ordered_by_number() {
        let repo = SeriesRealtimeDb::new(Arc::new(MemoryTree::new()));
        let series_id = repo
            .add(AddSeriesModel {
                title: "Mtaa".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        for number in [2, 1, 3] {
            repo.add_episode(&series_id, episode(number)).await.unwrap();
        }

        let numbers: Vec<u32> = repo
            .get_episodes(&series_id)
            .await
            .unwrap()
            .iter()
            .map(|episode| episode.episode_number)
            .collect();
        assert_eq!(numbers, [1, 2, 3]);
    }

    #[tokio::test]
    async fn deleting_a_series_takes_its_episodes() {
        let tree = Arc::new(MemoryTree::new());
        let repo = SeriesRealtimeDb::new(tree.clone());
        let series_id = repo.add(AddSeriesModel::default()).await.unwrap();
        repo.add_episode(&series_id, episode(1)).await.unwrap();

        repo.delete(&series_id).await.unwrap();

        assert!(repo.get_episodes(&series_id).await.unwrap().is_empty());
        assert_eq!(tree.snapshot().await, json!({ "series": {} }));
    }

    #[tokio::test]
    async fn episode_delete_leaves_siblings() {
        let tree = MemoryTree::with_data(json!({
            "series": { "s1": { "title": "Mtaa", "episodes": {
                "e1": { "episodeNumber": 1 },
                "e2": { "episodeNumber": 2 }
            } } }
        }));
        let repo = SeriesRealtimeDb::new(Arc::new(tree));

        repo.delete_episode("s1", "e1").await.unwrap();

        let episodes = repo.get_episodes("s1").await.unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].id, "e2");
        assert_eq!(repo.get_by_id("s1").await.unwrap().unwrap().title, "Mtaa");
    }

    #[tokio::test]
    async fn series_id_with_path_characters_is_rejected() {
        let repo = SeriesRealtimeDb::new(Arc::new(MemoryTree::new()));

        let err = repo.add_episode("s1/../users", episode(1)).await.unwrap_err();

        assert!(matches!(err, DataAccessError::InvalidKey(_)));
    }
}
