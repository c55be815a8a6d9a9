use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use storefront_core::{
    domain::{
        repositories::library::LibraryRepository,
        value_objects::library::{AddCartItemModel, AddLibraryItemModel},
    },
    infra::local_storage::library::LibraryLocalStore,
};

use crate::{auth::AuthUser, usecases::library::LibraryUseCase};

type Store = LibraryLocalStore;

pub fn routes(library: Arc<LibraryLocalStore>) -> Router {
    let library_usecase = LibraryUseCase::new(library);

    Router::new()
        .route(
            "/cart",
            get(cart::<Store>)
                .post(add_to_cart::<Store>)
                .delete(clear_cart::<Store>),
        )
        .route("/cart/:content_id", delete(remove_from_cart::<Store>))
        .route(
            "/wishlist",
            get(wishlist::<Store>).post(add_to_wishlist::<Store>),
        )
        .route(
            "/wishlist/:content_id",
            delete(remove_from_wishlist::<Store>),
        )
        .route(
            "/history",
            get(watch_history::<Store>).post(push_watch_history::<Store>),
        )
        .route("/orders", get(orders::<Store>))
        .with_state(Arc::new(library_usecase))
}

pub async fn cart<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase.cart(&auth.uid).await {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_to_cart<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
    Json(add_cart_item_model): Json<AddCartItemModel>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase
        .add_to_cart(&auth.uid, add_cart_item_model)
        .await
    {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_from_cart<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
    Path(content_id): Path<String>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase
        .remove_from_cart(&auth.uid, &content_id)
        .await
    {
        Ok(cart) => (StatusCode::OK, Json(cart)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn clear_cart<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase.clear_cart(&auth.uid).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn wishlist<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase.wishlist(&auth.uid).await {
        Ok(wishlist) => (StatusCode::OK, Json(wishlist)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_to_wishlist<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
    Json(add_library_item_model): Json<AddLibraryItemModel>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase
        .add_to_wishlist(&auth.uid, add_library_item_model)
        .await
    {
        Ok(wishlist) => (StatusCode::OK, Json(wishlist)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn remove_from_wishlist<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
    Path(content_id): Path<String>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase
        .remove_from_wishlist(&auth.uid, &content_id)
        .await
    {
        Ok(wishlist) => (StatusCode::OK, Json(wishlist)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn watch_history<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase.watch_history(&auth.uid).await {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn push_watch_history<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
    Json(add_library_item_model): Json<AddLibraryItemModel>,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase
        .push_watch_history(&auth.uid, add_library_item_model)
        .await
    {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn orders<L>(
    State(library_usecase): State<Arc<LibraryUseCase<L>>>,
    auth: AuthUser,
) -> Response
where
    L: LibraryRepository + Send + Sync + 'static,
{
    match library_usecase.orders(&auth.uid).await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => e.into_response(),
    }
}
