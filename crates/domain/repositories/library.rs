use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{
        library::{CartItemEntity, LibraryItemEntity},
        orders::OrderEntity,
    },
    value_objects::library::{AddCartItemModel, AddLibraryItemModel},
};

/// Per-user cart, wishlist, watch history and orders.
#[automock]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    async fn cart(&self, uid: &str) -> Result<Vec<CartItemEntity>>;
    /// Adding an item already in the cart bumps its quantity.
    async fn add_to_cart(&self, uid: &str, item: AddCartItemModel) -> Result<Vec<CartItemEntity>>;
    async fn remove_from_cart(&self, uid: &str, content_id: &str) -> Result<Vec<CartItemEntity>>;
    async fn clear_cart(&self, uid: &str) -> Result<()>;

    async fn wishlist(&self, uid: &str) -> Result<Vec<LibraryItemEntity>>;
    async fn add_to_wishlist(
        &self,
        uid: &str,
        item: AddLibraryItemModel,
    ) -> Result<Vec<LibraryItemEntity>>;
    async fn remove_from_wishlist(
        &self,
        uid: &str,
        content_id: &str,
    ) -> Result<Vec<LibraryItemEntity>>;

    /// Most recent first.
    async fn watch_history(&self, uid: &str) -> Result<Vec<LibraryItemEntity>>;
    async fn push_watch_history(
        &self,
        uid: &str,
        item: AddLibraryItemModel,
    ) -> Result<Vec<LibraryItemEntity>>;

    async fn orders(&self, uid: &str) -> Result<Vec<OrderEntity>>;
    async fn record_order(&self, uid: &str, order: OrderEntity) -> Result<()>;
}
