use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use storefront_core::{
    domain::repositories::users::UserRepository,
    infra::realtime_db::repositories::users::UserRealtimeDb, session::SessionState,
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
        .route(
            "/",
            get(current::<UserRealtimeDb>)
                .post(sign_in::<UserRealtimeDb>)
                .delete(sign_out::<UserRealtimeDb>),
        )
        .with_state(Arc::new(accounts_usecase))
}

pub async fn sign_in<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match accounts_usecase.sign_in(&auth).await {
        Ok(user) => (StatusCode::OK, Json(SessionState::SignedIn { user })).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn sign_out<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    let was_signed_in = accounts_usecase.sign_out(&auth.uid);
    (StatusCode::OK, Json(json!({ "signedOut": was_signed_in }))).into_response()
}

pub async fn current<U>(
    State(accounts_usecase): State<Arc<AccountsUseCase<U>>>,
    auth: AuthUser,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    (StatusCode::OK, Json(accounts_usecase.current(&auth.uid))).into_response()
}
