//! In-process store for development and tests
//!
//! Orders live in a `DashMap`; the paid transition runs under the entry's
//! shard lock so concurrent settlements see one winner, like the
//! `WHERE payment_status <> 'paid'` update in Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{Mutex, RwLock};
use shared::models::{
    CategoryOffer, GlobalSaleConfig, Notification, NotificationCreate, NotificationKind, Order,
    Product,
};

use super::{OfferStore, OrderStore, PaidPatch, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    orders: DashMap<String, Order>,
    notifications: Mutex<Vec<Notification>>,
    products: DashMap<String, Product>,
    category_offers: RwLock<HashMap<String, CategoryOffer>>,
    sale_config: RwLock<Option<GlobalSaleConfig>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog product (the catalog itself is owned elsewhere)
    pub fn insert_product(&self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.orders.get(id).map(|o| o.value().clone()))
    }

    async fn conditional_update(&self, id: &str, patch: &PaidPatch) -> StoreResult<bool> {
        let Some(mut order) = self.orders.get_mut(id) else {
            return Ok(false);
        };
        if order.is_paid() {
            return Ok(false);
        }
        patch.apply(&mut order);
        Ok(true)
    }

    async fn attach_gateway_order(&self, id: &str, gateway_order_ref: &str) -> StoreResult<bool> {
        let Some(mut order) = self.orders.get_mut(id) else {
            return Ok(false);
        };
        if order.is_paid() || order.gateway_order_ref.is_some() {
            return Ok(false);
        }
        order.gateway_order_ref = Some(gateway_order_ref.to_string());
        Ok(true)
    }

    async fn find_notification_by_order(
        &self,
        order_id: &str,
        kind: NotificationKind,
    ) -> StoreResult<Option<Notification>> {
        let notifications = self.notifications.lock();
        Ok(notifications
            .iter()
            .find(|n| n.order_id == order_id && n.kind == kind)
            .cloned())
    }

    async fn create_notification(
        &self,
        data: NotificationCreate,
        now: i64,
    ) -> StoreResult<Option<Notification>> {
        let mut notifications = self.notifications.lock();
        if notifications
            .iter()
            .any(|n| n.order_id == data.order_id && n.kind == data.kind)
        {
            return Ok(None);
        }
        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            kind: data.kind,
            title: data.title,
            message: data.message,
            order_id: data.order_id,
            is_read: false,
            created_at: now,
        };
        notifications.push(notification.clone());
        Ok(Some(notification))
    }

    async fn create_order(&self, order: &Order) -> StoreResult<()> {
        match self.orders.entry(order.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(order.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(order.clone());
                Ok(())
            }
        }
    }

    async fn list_notifications(&self, limit: i64) -> StoreResult<(Vec<Notification>, i64)> {
        let notifications = self.notifications.lock();
        let unread = notifications.iter().filter(|n| !n.is_read).count() as i64;
        let mut latest = notifications.clone();
        latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        latest.truncate(usize::try_from(limit).unwrap_or(0));
        Ok((latest, unread))
    }

    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        let mut notifications = self.notifications.lock();
        match notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OfferStore for MemoryStore {
    async fn list_category_offers(&self) -> StoreResult<Vec<CategoryOffer>> {
        let mut offers: Vec<_> = self.category_offers.read().values().cloned().collect();
        offers.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(offers)
    }

    async fn get_global_sale_config(&self) -> StoreResult<Option<GlobalSaleConfig>> {
        Ok(self.sale_config.read().clone())
    }

    async fn upsert_category_offer(&self, offer: &CategoryOffer) -> StoreResult<()> {
        self.category_offers
            .write()
            .insert(offer.category.clone(), offer.clone());
        Ok(())
    }

    async fn delete_category_offer(&self, category: &str) -> StoreResult<bool> {
        Ok(self.category_offers.write().remove(category).is_some())
    }

    async fn put_global_sale_config(&self, config: &GlobalSaleConfig) -> StoreResult<()> {
        *self.sale_config.write() = Some(config.clone());
        Ok(())
    }

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.get(id).map(|p| p.value().clone()))
    }
}
