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
        repositories::{updates::UpdateItemRepository, users::UserRepository},
        value_objects::home_content::{AddUpdateItemModel, EditUpdateItemModel},
    },
    infra::realtime_db::repositories::{updates::UpdateItemRealtimeDb, users::UserRealtimeDb},
};

use crate::{
    auth::AuthUser, axum_http::dependencies::AppDependencies,
    usecases::home_content::UpdatesUseCase,
};

type Updates = UpdateItemRealtimeDb;
type Users = UserRealtimeDb;

pub fn routes(deps: &AppDependencies) -> Router {
    let update_repository = UpdateItemRealtimeDb::new(Arc::clone(&deps.tree));
    let user_repository = UserRealtimeDb::new(Arc::clone(&deps.tree));
    let updates_usecase = UpdatesUseCase::new(Arc::new(update_repository), Arc::new(user_repository));

    Router::new()
        .route("/", get(list::<Updates, Users>).post(add::<Updates, Users>))
        .route(
            "/:id",
            get(get_by_id::<Updates, Users>)
                .patch(update::<Updates, Users>)
                .delete(remove::<Updates, Users>),
        )
        .with_state(Arc::new(updates_usecase))
}

pub async fn list<R, U>(State(updates_usecase): State<Arc<UpdatesUseCase<R, U>>>) -> Response
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match updates_usecase.list().await {
        Ok(updates) => (StatusCode::OK, Json(updates)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<R, U>(
    State(updates_usecase): State<Arc<UpdatesUseCase<R, U>>>,
    Path(id): Path<String>,
) -> Response
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match updates_usecase.get(&id).await {
        Ok(update) => (StatusCode::OK, Json(update)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add<R, U>(
    State(updates_usecase): State<Arc<UpdatesUseCase<R, U>>>,
    auth: AuthUser,
    Json(add_update_model): Json<AddUpdateItemModel>,
) -> Response
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match updates_usecase.add(&auth.uid, add_update_model).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<R, U>(
    State(updates_usecase): State<Arc<UpdatesUseCase<R, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(edit_update_model): Json<EditUpdateItemModel>,
) -> Response
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match updates_usecase.update(&auth.uid, &id, edit_update_model).await {
        Ok(update) => (StatusCode::OK, Json(update)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove<R, U>(
    State(updates_usecase): State<Arc<UpdatesUseCase<R, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response
where
    R: UpdateItemRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match updates_usecase.delete(&auth.uid, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
