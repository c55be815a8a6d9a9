use async_trait::async_trait;
use mockall::automock;

use super::data_access_error::DataAccessResult;
use crate::domain::{
    entities::movies::MovieEntity,
    value_objects::catalog::{AddMovieModel, EditMovieModel},
};

#[automock]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Newest first.
    async fn get_all(&self) -> DataAccessResult<Vec<MovieEntity>>;
    async fn get_by_id(&self, id: &str) -> DataAccessResult<Option<MovieEntity>>;
    async fn add(&self, movie: AddMovieModel, created_by: Option<String>)
    -> DataAccessResult<String>;
    async fn update(&self, id: &str, changes: EditMovieModel) -> DataAccessResult<()>;
    async fn delete(&self, id: &str) -> DataAccessResult<()>;
}
