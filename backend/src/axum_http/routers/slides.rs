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
        repositories::{slides::SlideRepository, users::UserRepository},
        value_objects::home_content::{AddSlideModel, EditSlideModel},
    },
    infra::realtime_db::repositories::{slides::SlideRealtimeDb, users::UserRealtimeDb},
};

use crate::{
    auth::AuthUser, axum_http::dependencies::AppDependencies,
    usecases::home_content::SlidesUseCase,
};

type Slides = SlideRealtimeDb;
type Users = UserRealtimeDb;

pub fn routes(deps: &AppDependencies) -> Router {
    let slide_repository = SlideRealtimeDb::new(Arc::clone(&deps.tree));
    let user_repository = UserRealtimeDb::new(Arc::clone(&deps.tree));
    let slides_usecase = SlidesUseCase::new(Arc::new(slide_repository), Arc::new(user_repository));

    Router::new()
        .route("/", get(list::<Slides, Users>).post(add::<Slides, Users>))
        .route(
            "/:id",
            get(get_by_id::<Slides, Users>)
                .patch(update::<Slides, Users>)
                .delete(remove::<Slides, Users>),
        )
        .with_state(Arc::new(slides_usecase))
}

pub async fn list<S, U>(State(slides_usecase): State<Arc<SlidesUseCase<S, U>>>) -> Response
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match slides_usecase.list().await {
        Ok(slides) => (StatusCode::OK, Json(slides)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<S, U>(
    State(slides_usecase): State<Arc<SlidesUseCase<S, U>>>,
    Path(id): Path<String>,
) -> Response
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match slides_usecase.get(&id).await {
        Ok(slide) => (StatusCode::OK, Json(slide)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add<S, U>(
    State(slides_usecase): State<Arc<SlidesUseCase<S, U>>>,
    auth: AuthUser,
    Json(add_slide_model): Json<AddSlideModel>,
) -> Response
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match slides_usecase.add(&auth.uid, add_slide_model).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<S, U>(
    State(slides_usecase): State<Arc<SlidesUseCase<S, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(edit_slide_model): Json<EditSlideModel>,
) -> Response
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match slides_usecase.update(&auth.uid, &id, edit_slide_model).await {
        Ok(slide) => (StatusCode::OK, Json(slide)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove<S, U>(
    State(slides_usecase): State<Arc<SlidesUseCase<S, U>>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Response
where
    S: SlideRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    match slides_usecase.delete(&auth.uid, &id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
