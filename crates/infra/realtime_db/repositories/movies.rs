use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    entities::movies::{EditMovieEntity, InsertMovieEntity, MOVIES_PATH, MovieEntity},
    repositories::{
        data_access_error::DataAccessResult, movies::MovieRepository,
        realtime_tree::RealtimeTree,
    },
    value_objects::catalog::{AddMovieModel, EditMovieModel},
};
use crate::infra::realtime_db::collection;

pub struct MovieRealtimeDb {
    tree: Arc<dyn RealtimeTree>,
}

impl MovieRealtimeDb {
    pub fn new(tree: Arc<dyn RealtimeTree>) -> Self {
        Self { tree }
    }
}

#[async_trait]
impl MovieRepository for MovieRealtimeDb {
    async fn get_all(&self) -> DataAccessResult<Vec<MovieEntity>> {
        collection::read_all_newest_first(self.tree.as_ref(), MOVIES_PATH).await
    }

    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<MovieEntity>> {
        collection::read_one(self.tree.as_ref(), MOVIES_PATH, id).await
    }

    async fn add(
        &self,
        movie: AddMovieModel,
        created_by: Option<String>,
    ) -> DataAccessResult<String> {
        let entity = InsertMovieEntity::new(movie, created_by, collection::now_millis());
        collection::append(self.tree.as_ref(), MOVIES_PATH, entity).await
    }

    async fn update(&self, id: &str, changes: EditMovieModel) -> DataAccessResult<()> {
        let entity = EditMovieEntity::new(changes, collection::now_millis());
        collection::merge(self.tree.as_ref(), MOVIES_PATH, id, entity).await
    }

    async fn delete(&self, id: &str) -> DataAccessResult<()> {
        collection::remove(self.tree.as_ref(), MOVIES_PATH, id).await
    }
}
