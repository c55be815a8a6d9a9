use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::domain::{
    entities::{
        library::{CartItemEntity, LibraryItemEntity},
        orders::OrderEntity,
    },
    repositories::{library::LibraryRepository, local_store::LocalStore},
    value_objects::library::{AddCartItemModel, AddLibraryItemModel, MAX_WATCH_HISTORY},
};
use crate::infra::realtime_db::collection::now_millis;

const CART: &str = "cart";
const WISHLIST: &str = "wishlist";
const HISTORY: &str = "history";
const ORDERS: &str = "orders";

/// Library lists kept as whole JSON arrays, one document per user and list.
pub struct LibraryLocalStore {
    store: Arc<dyn LocalStore>,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LibraryLocalStore {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn read_list<T: DeserializeOwned>(&self, uid: &str, list: &str) -> Result<Vec<T>> {
        let key = format!("{uid}/{list}");
        match self.store.load(&key).await? {
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("stored {list} for {uid} is not a valid list")),
            None => Ok(Vec::new()),
        }
    }

    async fn write_list<T: Serialize>(&self, uid: &str, list: &str, items: &[T]) -> Result<()> {
        let key = format!("{uid}/{list}");
        self.store.save(&key, serde_json::to_value(items)?).await
    }
}

#[async_trait]
impl LibraryRepository for LibraryLocalStore {
    async fn cart(&self, uid: &str) -> Result<Vec<CartItemEntity>> {
        self.read_list(uid, CART).await
    }

    async fn add_to_cart(&self, uid: &str, item: AddCartItemModel) -> Result<Vec<CartItemEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut cart: Vec<CartItemEntity> = self.read_list(uid, CART).await?;
        let quantity = item.quantity.unwrap_or(1).max(1);

        match cart
            .iter_mut()
            .find(|existing| existing.content_id == item.content_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => cart.push(CartItemEntity {
                content_id: item.content_id,
                title: item.title,
                poster: item.poster,
                price: item.price,
                quantity,
            }),
        }

        self.write_list(uid, CART, &cart).await?;
        Ok(cart)
    }

    async fn remove_from_cart(&self, uid: &str, content_id: &str) -> Result<Vec<CartItemEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut cart: Vec<CartItemEntity> = self.read_list(uid, CART).await?;
        cart.retain(|item| item.content_id != content_id);
        self.write_list(uid, CART, &cart).await?;
        Ok(cart)
    }

    async fn clear_cart(&self, uid: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store.delete(&format!("{uid}/{CART}")).await
    }

    async fn wishlist(&self, uid: &str) -> Result<Vec<LibraryItemEntity>> {
        self.read_list(uid, WISHLIST).await
    }

    async fn add_to_wishlist(
        &self,
        uid: &str,
        item: AddLibraryItemModel,
    ) -> Result<Vec<LibraryItemEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut wishlist: Vec<LibraryItemEntity> = self.read_list(uid, WISHLIST).await?;

        if !wishlist
            .iter()
            .any(|existing| existing.content_id == item.content_id)
        {
            wishlist.push(LibraryItemEntity {
                content_id: item.content_id,
                title: item.title,
                poster: item.poster,
                added_at: now_millis(),
            });
            self.write_list(uid, WISHLIST, &wishlist).await?;
        }

        Ok(wishlist)
    }

    async fn remove_from_wishlist(
        &self,
        uid: &str,
        content_id: &str,
    ) -> Result<Vec<LibraryItemEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut wishlist: Vec<LibraryItemEntity> = self.read_list(uid, WISHLIST).await?;
        wishlist.retain(|item| item.content_id != content_id);
        self.write_list(uid, WISHLIST, &wishlist).await?;
        Ok(wishlist)
    }

    async fn watch_history(&self, uid: &str) -> Result<Vec<LibraryItemEntity>> {
        self.read_list(uid, HISTORY).await
    }

    async fn push_watch_history(
        &self,
        uid: &str,
        item: AddLibraryItemModel,
    ) -> Result<Vec<LibraryItemEntity>> {
        let _guard = self.write_lock.lock().await;
        let mut history: Vec<LibraryItemEntity> = self.read_list(uid, HISTORY).await?;

        history.retain(|existing| existing.content_id != item.content_id);
        history.insert(
            0,
            LibraryItemEntity {
                content_id: item.content_id,
                title: item.title,
                poster: item.poster,
                added_at: now_millis(),
            },
        );
        history.truncate(MAX_WATCH_HISTORY);

        self.write_list(uid, HISTORY, &history).await?;
        Ok(history)
    }

    async fn orders(&self, uid: &str) -> Result<Vec<OrderEntity>> {
        self.read_list(uid, ORDERS).await
    }

    async fn record_order(&self, uid: &str, order: OrderEntity) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut orders: Vec<OrderEntity> = self.read_list(uid, ORDERS).await?;

        // A confirmation can be observed twice (poll and return page); keep one record.
        match orders
            .iter_mut()
            .find(|existing| existing.reference == order.reference)
        {
            Some(existing) => *existing = order,
            None => orders.insert(0, order),
        }

        self.write_list(uid, ORDERS, &orders).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::{
        payment_rails::PaymentRailKind, payment_statuses::PaymentStatus,
    };
    use crate::infra::local_storage::json_file_store::JsonFileStore;

    fn library(dir: &tempfile::TempDir) -> LibraryLocalStore {
        LibraryLocalStore::new(Arc::new(JsonFileStore::new(dir.path())))
    }

    fn cart_item(content_id: &str) -> AddCartItemModel {
        AddCartItemModel {
            content_id: content_id.to_string(),
            title: format!("Title {content_id}"),
            poster: None,
            price: 250.0,
            quantity: None,
        }
    }

    fn watched(content_id: &str) -> AddLibraryItemModel {
        AddLibraryItemModel {
            content_id: content_id.to_string(),
            title: format!("Title {content_id}"),
            poster: None,
        }
    }

    #[tokio::test]
    async fn adding_the_same_item_twice_bumps_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(&dir);

        library.add_to_cart("u1", cart_item("m1")).await.unwrap();
        let cart = library.add_to_cart("u1", cart_item("m1")).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 2);
        assert_eq!(cart[0].line_total(), 500.0);
        assert_eq!(library.cart("u1").await.unwrap(), cart);
        assert!(library.cart("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quantity_saturates_instead_of_overflowing() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(&dir);

        library
            .add_to_cart(
                "u1",
                AddCartItemModel {
                    quantity: Some(u32::MAX),
                    ..cart_item("m1")
                },
            )
            .await
            .unwrap();
        let cart = library
            .add_to_cart(
                "u1",
                AddCartItemModel {
                    quantity: Some(1),
                    ..cart_item("m1")
                },
            )
            .await
            .unwrap();

        assert_eq!(cart[0].quantity, u32::MAX);
    }

    #[tokio::test]
    async fn clearing_the_cart_empties_it() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(&dir);
        library.add_to_cart("u1", cart_item("m1")).await.unwrap();

        library.clear_cart("u1").await.unwrap();

        assert!(library.cart("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_is_most_recent_first_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(&dir);

        for content_id in ["a", "b", "a"] {
            library
                .push_watch_history("u1", watched(content_id))
                .await
                .unwrap();
        }

        let ids: Vec<String> = library
            .watch_history("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.content_id)
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(&dir);

        for index in 0..(MAX_WATCH_HISTORY + 5) {
            library
                .push_watch_history("u1", watched(&format!("c{index}")))
                .await
                .unwrap();
        }

        let history = library.watch_history("u1").await.unwrap();
        assert_eq!(history.len(), MAX_WATCH_HISTORY);
        assert_eq!(history[0].content_id, format!("c{}", MAX_WATCH_HISTORY + 4));
    }

    #[tokio::test]
    async fn recording_an_order_twice_keeps_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let library = library(&dir);
        let order = OrderEntity {
            reference: "MOMO_1_abc".to_string(),
            rail: PaymentRailKind::MobilePush,
            amount: 500.0,
            currency: "KES".to_string(),
            description: "Cart checkout".to_string(),
            status: PaymentStatus::Completed,
            items: Vec::new(),
            created_at: 1,
        };

        library.record_order("u1", order.clone()).await.unwrap();
        library.record_order("u1", order.clone()).await.unwrap();

        assert_eq!(library.orders("u1").await.unwrap(), vec![order]);
    }
}
