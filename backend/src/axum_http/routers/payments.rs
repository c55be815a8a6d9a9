use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use storefront_core::{
    domain::{
        repositories::library::LibraryRepository,
        value_objects::enums::payment_rails::PaymentRailKind,
    },
    infra::local_storage::library::LibraryLocalStore,
};

use crate::{
    auth::AuthUser,
    axum_http::dependencies::AppDependencies,
    usecases::checkout::{CheckoutModel, CheckoutUseCase, RedirectReturnModel},
};

pub fn routes(deps: &AppDependencies, library: Arc<LibraryLocalStore>) -> Router {
    let checkout_usecase = CheckoutUseCase::new(
        Arc::clone(&deps.gateway),
        deps.polling,
        deps.callback_url.clone(),
        Arc::clone(&deps.attempts),
        Arc::clone(&deps.sessions),
        library,
    );

    Router::new()
        .route("/checkout", post(checkout::<LibraryLocalStore>))
        .route(
            "/:reference",
            get(status::<LibraryLocalStore>).delete(cancel::<LibraryLocalStore>),
        )
        .route("/paypal/return", post(paypal_return::<LibraryLocalStore>))
        .route("/pesapal/return", post(pesapal_return::<LibraryLocalStore>))
        .with_state(Arc::new(checkout_usecase))
}

pub async fn checkout<L>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<L>>>,
    auth: AuthUser,
    Json(checkout_model): Json<CheckoutModel>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match checkout_usecase.start(&auth.uid, checkout_model).await {
        Ok(snapshot) => (StatusCode::CREATED, Json(snapshot)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn status<L>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<L>>>,
    auth: AuthUser,
    Path(reference): Path<String>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match checkout_usecase.status(&auth.uid, &reference) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn cancel<L>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<L>>>,
    auth: AuthUser,
    Path(reference): Path<String>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match checkout_usecase.cancel(&auth.uid, &reference) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn paypal_return<L>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<L>>>,
    auth: AuthUser,
    Json(redirect_return): Json<RedirectReturnModel>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    verify_return(&checkout_usecase, &auth, PaymentRailKind::PayPal, redirect_return).await
}

pub async fn pesapal_return<L>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<L>>>,
    auth: AuthUser,
    Json(redirect_return): Json<RedirectReturnModel>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    verify_return(&checkout_usecase, &auth, PaymentRailKind::PesaPal, redirect_return).await
}

async fn verify_return<L>(
    checkout_usecase: &CheckoutUseCase<L>,
    auth: &AuthUser,
    rail: PaymentRailKind,
    redirect_return: RedirectReturnModel,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match checkout_usecase
        .verify_return(&auth.uid, rail, redirect_return)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
