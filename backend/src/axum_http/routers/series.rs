use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde_json::json;
use storefront_core::{
    domain::{
        repositories::{series::SeriesRepository, users::UserRepository},
        value_objects::catalog::{AddEpisodeModel, AddSeriesModel, EditSeriesModel},
    },
    infra::realtime_db::repositories::{series::SeriesRealtimeDb, users::UserRealtimeDb},
};

use crate::{
    auth::AuthUser, axum_http::dependencies::AppDependencies, usecases::series::SeriesUseCase,
};

type Series = SeriesRealtimeDb;
type Users = UserRealtimeDb;

pub fn routes(deps: &AppDependencies) -> Router {
    let series_repository = SeriesRealtimeDb::new(Arc::clone(&deps.tree));
    let user_repository = UserRealtimeDb::new(Arc::clone(&deps.tree));
    let series_usecase = SeriesUseCase::new(Arc::new(series_repository), Arc::new(user_repository));

    Router::new()
        .route("/", get(list::<Series, Users>).post(add::<Series, Users>))
        .route(
            "/:id",
            get(get_by_id::<Series, Users>)
                .patch(update::<Series, Users>)
                .delete(remove::<Series, Users>),
        )
        .route(
            "/:id/episodes",
            get(episodes::<Series, Users>).post(add_episode::<Series, Users>),
        )
        .route(
            "/:id/episodes/:episode_id",
            delete(delete_episode::<Series, Users>),
        )
        .with_state(Arc::new(series_usecase))
}

pub async fn list<S, U>(State(series_usecase): State<Arc<SeriesUseCase<S, U>>>) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase.list().await {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    Path(id): Path<String>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase.get(&id).await {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn episodes<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    Path(id): Path<String>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase.episodes(&id).await {
        Ok(episodes) => (StatusCode::OK, Json(episodes)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    auth: AuthUser,
    Json(add_series_model): Json<AddSeriesModel>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase.add(&auth.uid, add_series_model).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(edit_series_model): Json<EditSeriesModel>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase.update(&auth.uid, &id, edit_series_model).await {
        Ok(series) => (StatusCode::OK, Json(series)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase.delete(&auth.uid, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_episode<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(add_episode_model): Json<AddEpisodeModel>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase
        .add_episode(&auth.uid, &id, add_episode_model)
        .await
    {
        Ok(episode_id) => (StatusCode::CREATED, Json(json!({ "id": episode_id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_episode<S, U>(
    State(series_usecase): State<Arc<SeriesUseCase<S, U>>>,
    auth: AuthUser,
    Path((id, episode_id)): Path<(String, String)>,
) -> Response
where
    S: SeriesRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match series_usecase
        .delete_episode(&auth.uid, &id, &episode_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
