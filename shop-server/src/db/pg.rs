//! PostgreSQL-backed stores

use async_trait::async_trait;
use shared::models::{
    CategoryOffer, GlobalSaleConfig, Notification, NotificationCreate, NotificationKind, Order,
    Product,
};
use sqlx::PgPool;

use super::{
    OfferStore, OrderStore, PaidPatch, StoreResult, notifications, offers, orders, products,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and run embedded migrations
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        orders::find_by_id(&self.pool, id).await
    }

    async fn conditional_update(&self, id: &str, patch: &PaidPatch) -> StoreResult<bool> {
        orders::mark_paid_if_unpaid(&self.pool, id, patch).await
    }

    async fn attach_gateway_order(&self, id: &str, gateway_order_ref: &str) -> StoreResult<bool> {
        orders::attach_gateway_order(&self.pool, id, gateway_order_ref).await
    }

    async fn find_notification_by_order(
        &self,
        order_id: &str,
        kind: NotificationKind,
    ) -> StoreResult<Option<Notification>> {
        notifications::find_by_order(&self.pool, order_id, kind).await
    }

    async fn create_notification(
        &self,
        data: NotificationCreate,
        now: i64,
    ) -> StoreResult<Option<Notification>> {
        notifications::create_if_absent(&self.pool, &data, now).await
    }

    async fn create_order(&self, order: &Order) -> StoreResult<()> {
        orders::create(&self.pool, order).await
    }

    async fn list_notifications(&self, limit: i64) -> StoreResult<(Vec<Notification>, i64)> {
        let latest = notifications::list_latest(&self.pool, limit).await?;
        let unread = notifications::count_unread(&self.pool).await?;
        Ok((latest, unread))
    }

    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        notifications::mark_read(&self.pool, id).await
    }
}

#[async_trait]
impl OfferStore for PgStore {
    async fn list_category_offers(&self) -> StoreResult<Vec<CategoryOffer>> {
        offers::list_category_offers(&self.pool).await
    }

    async fn get_global_sale_config(&self) -> StoreResult<Option<GlobalSaleConfig>> {
        offers::get_global_sale_config(&self.pool).await
    }

    async fn upsert_category_offer(&self, offer: &CategoryOffer) -> StoreResult<()> {
        offers::upsert_category_offer(&self.pool, offer).await
    }

    async fn delete_category_offer(&self, category: &str) -> StoreResult<bool> {
        offers::delete_category_offer(&self.pool, category).await
    }

    async fn put_global_sale_config(&self, config: &GlobalSaleConfig) -> StoreResult<()> {
        offers::put_global_sale_config(&self.pool, config).await
    }

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        products::find_by_id(&self.pool, id).await
    }
}
