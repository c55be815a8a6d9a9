use std::sync::Arc;

use axum::http::StatusCode;
use storefront_core::domain::{
    entities::{
        library::{CartItemEntity, LibraryItemEntity},
        orders::OrderEntity,
    },
    repositories::library::LibraryRepository,
    value_objects::{
        fields::is_valid_key,
        library::{AddCartItemModel, AddLibraryItemModel},
    },
};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LibraryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LibraryError::Invalid(_) => StatusCode::BAD_REQUEST,
            LibraryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;

/// The signed-in user's cart, wishlist, watch history and orders.
pub struct LibraryUseCase<L>
where
    L: LibraryRepository + Send + Sync + 'static,
{
    library_repo: Arc<L>,
}

impl<L> LibraryUseCase<L>
where
    L: LibraryRepository + Send + Sync + 'static,
{
    pub fn new(library_repo: Arc<L>) -> Self {
        Self { library_repo }
    }

    pub async fn cart(&self, uid: &str) -> LibraryResult<Vec<CartItemEntity>> {
        Ok(self.library_repo.cart(uid).await.inspect_err(log_store_error)?)
    }

    pub async fn add_to_cart(
        &self,
        uid: &str,
        item: AddCartItemModel,
    ) -> LibraryResult<Vec<CartItemEntity>> {
        validate_item(&item.content_id, &item.title)?;
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(LibraryError::Invalid(
                "Price must be zero or more".to_string(),
            ));
        }
        if item.quantity == Some(0) {
            return Err(LibraryError::Invalid("Quantity must be at least 1".to_string()));
        }

        let content_id = item.content_id.clone();
        let cart = self
            .library_repo
            .add_to_cart(uid, item)
            .await
            .inspect_err(log_store_error)?;

        info!(uid, %content_id, items = cart.len(), "library: added to cart");
        Ok(cart)
    }

    pub async fn remove_from_cart(
        &self,
        uid: &str,
        content_id: &str,
    ) -> LibraryResult<Vec<CartItemEntity>> {
        Ok(self
            .library_repo
            .remove_from_cart(uid, content_id)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn clear_cart(&self, uid: &str) -> LibraryResult<()> {
        Ok(self
            .library_repo
            .clear_cart(uid)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn wishlist(&self, uid: &str) -> LibraryResult<Vec<LibraryItemEntity>> {
        Ok(self
            .library_repo
            .wishlist(uid)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn add_to_wishlist(
        &self,
        uid: &str,
        item: AddLibraryItemModel,
    ) -> LibraryResult<Vec<LibraryItemEntity>> {
        validate_item(&item.content_id, &item.title)?;
        Ok(self
            .library_repo
            .add_to_wishlist(uid, item)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn remove_from_wishlist(
        &self,
        uid: &str,
        content_id: &str,
    ) -> LibraryResult<Vec<LibraryItemEntity>> {
        Ok(self
            .library_repo
            .remove_from_wishlist(uid, content_id)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn watch_history(&self, uid: &str) -> LibraryResult<Vec<LibraryItemEntity>> {
        Ok(self
            .library_repo
            .watch_history(uid)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn push_watch_history(
        &self,
        uid: &str,
        item: AddLibraryItemModel,
    ) -> LibraryResult<Vec<LibraryItemEntity>> {
        validate_item(&item.content_id, &item.title)?;
        Ok(self
            .library_repo
            .push_watch_history(uid, item)
            .await
            .inspect_err(log_store_error)?)
    }

    pub async fn orders(&self, uid: &str) -> LibraryResult<Vec<OrderEntity>> {
        Ok(self
            .library_repo
            .orders(uid)
            .await
            .inspect_err(log_store_error)?)
    }
}

fn validate_item(content_id: &str, title: &str) -> LibraryResult<()> {
    if !is_valid_key(content_id) {
        return Err(LibraryError::Invalid(format!(
            "Invalid content id `{content_id}`"
        )));
    }
    if title.trim().is_empty() {
        return Err(LibraryError::Invalid("Title is required".to_string()));
    }
    Ok(())
}

fn log_store_error(err: &anyhow::Error) {
    error!(store_error = ?err, "library: local store failed");
}
