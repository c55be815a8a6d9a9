use std::sync::Arc;

use storefront_core::domain::{
    entities::movies::MovieEntity,
    repositories::{movies::MovieRepository, users::UserRepository},
    value_objects::catalog::{AddMovieModel, EditMovieModel, is_valid_rating},
};
use tracing::{error, info};

use super::{
    access::AccessControl,
    errors::{ContentError, UseCaseResult},
};

pub struct MoviesUseCase<M, U>
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    movie_repo: Arc<M>,
    access: AccessControl<U>,
}

impl<M, U> MoviesUseCase<M, U>
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(movie_repo: Arc<M>, user_repo: Arc<U>) -> Self {
        Self {
            movie_repo,
            access: AccessControl::new(user_repo),
        }
    }

    pub async fn list(&self) -> UseCaseResult<Vec<MovieEntity>> {
        self.movie_repo.get_all().await.map_err(|err| {
            error!(db_error = ?err, "catalog: failed to list movies");
            ContentError::from(err)
        })
    }

    pub async fn get(&self, id: &str) -> UseCaseResult<MovieEntity> {
        self.movie_repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound("Movie"))
    }

    pub async fn add(&self, actor_uid: &str, movie: AddMovieModel) -> UseCaseResult<String> {
        self.access.require_admin(actor_uid).await?;

        if movie.title.trim().is_empty() {
            return Err(ContentError::Invalid("Title is required".to_string()));
        }
        validate_rating(Some(movie.rating))?;

        let id = self
            .movie_repo
            .add(movie, Some(actor_uid.to_string()))
            .await
            .map_err(|err| {
                error!(db_error = ?err, "catalog: failed to add movie");
                ContentError::from(err)
            })?;

        info!(%id, actor_uid, "catalog: movie added");
        Ok(id)
    }

    pub async fn update(
        &self,
        actor_uid: &str,
        id: &str,
        changes: EditMovieModel,
    ) -> UseCaseResult<MovieEntity> {
        self.access.require_admin(actor_uid).await?;
        validate_rating(changes.rating)?;

        // A merge on a missing key would create a partial record.
        self.get(id).await?;
        self.movie_repo.update(id, changes).await.map_err(|err| {
            error!(db_error = ?err, id, "catalog: failed to update movie");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "catalog: movie updated");
        self.get(id).await
    }

    pub async fn delete(&self, actor_uid: &str, id: &str) -> UseCaseResult<()> {
        self.access.require_admin(actor_uid).await?;

        self.movie_repo.delete(id).await.map_err(|err| {
            error!(db_error = ?err, id, "catalog: failed to delete movie");
            ContentError::from(err)
        })?;

        info!(id, actor_uid, "catalog: movie deleted");
        Ok(())
    }
}

fn validate_rating(rating: Option<f64>) -> UseCaseResult<()> {
    match rating {
        Some(rating) if !is_valid_rating(rating) => Err(ContentError::Invalid(
            "Rating must be between 0 and 5".to_string(),
        )),
        _ => Ok(()),
    }
}
