use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use storefront_core::{
    domain::{repositories::users::UserRepository, value_objects::users::EditUserModel},
    infra::realtime_db::repositories::users::UserRealtimeDb,
};

use crate::{
    auth::AuthUser, axum_http::dependencies::AppDependencies, usecases::accounts::AccountsUseCase,
};

pub fn routes(deps: &AppDependencies) -> Router {
    let user_repository = UserRealtimeDb::new(Arc::clone(&deps.tree));
    let accounts_usecase = AccountsUseCase::new(
        Arc::new(user_repository),
        deps.admin_allow_list.clone(),
        Arc::clone(&deps.sessions),
        Arc::clone(&deps.attempts),
    );

    Router::new()
        .route("/", get(list::<UserRealtimeDb>))
        .route(
            "/:id",
            get(get_by_id::<UserRealtimeDb>)
                .patch(update::<UserRealtimeDb>)
                .delete(remove::<UserRealtimeDb>),
        )
        .with_state(Arc::new(accounts_usecase))
}

pub async fn list<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match accounts_usecase.list_users(&auth.uid).await {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_id<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
    Path(uid): Path<String>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match accounts_usecase.get_user(&auth.uid, &uid).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
    Path(uid): Path<String>,
    Json(edit_user_model): Json<EditUserModel>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match accounts_usecase
        .update_user(&auth.uid, &uid, edit_user_model)
        .await
    {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
    Path(uid): Path<String>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match accounts_usecase.delete_user(&auth.uid, &uid).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
