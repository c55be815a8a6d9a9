use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use storefront_core::{
    domain::{
        repositories::{movies::MovieRepository, users::UserRepository},
        value_objects::catalog::{AddMovieModel, EditMovieModel},
    },
    infra::realtime_db::repositories::{movies::MovieRealtimeDb, users::UserRealtimeDb},
};

use crate::{
    auth::AuthUser, axum_http::dependencies::AppDependencies, usecases::movies::MoviesUseCase,
};

pub fn routes(deps: &AppDependencies) -> Router {
    let movie_repository = MovieRealtimeDb::new(Arc::clone(&deps.tree));
    let user_repository = UserRealtimeDb::new(Arc::clone(&deps.tree));
    let movies_usecase = MoviesUseCase::new(Arc::new(movie_repository), Arc::new(user_repository));

    Router::new()
        .route(
            "/",
            get(list::<MovieRealtimeDb, UserRealtimeDb>).post(add::<MovieRealtimeDb, UserRealtimeDb>),
        )
        .route(
            "/:id",
            get(get_by_id::<MovieRealtimeDb, UserRealtimeDb>)
                .patch(update::<MovieRealtimeDb, UserRealtimeDb>)
                .delete(delete::<MovieRealtimeDb, UserRealtimeDb>),
        )
        .with_state(Arc::new(movies_usecase))
}

pub async fn list<M, U>(State(movies_usecase): State<Arc<MoviesUseCase<M, U>>>) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match movies_usecase.list().await {
        Ok(movies) => (StatusCode::OK, Json(movies)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<M, U>(
    State(movies_usecase): State<Arc<MoviesUseCase<M, U>>>,
    Path(id): Path<String>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match movies_usecase.get(&id).await {
        Ok(movie) => (StatusCode::OK, Json(movie)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add<M, U>(
    State(movies_usecase): State<Arc<MoviesUseCase<M, U>>>,
    auth: AuthUser,
    Json(add_movie_model): Json<AddMovieModel>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match movies_usecase.add(&auth.uid, add_movie_model).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<M, U>(
    State(movies_usecase): State<Arc<MoviesUseCase<M, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(edit_movie_model): Json<EditMovieModel>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match movies_usecase.update(&auth.uid, &id, edit_movie_model).await {
        Ok(movie) => (StatusCode::OK, Json(movie)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete<M, U>(
    State(movies_usecase): State<Arc<MoviesUseCase<M, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match movies_usecase.delete(&auth.uid, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
