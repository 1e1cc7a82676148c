//! Storage layer
//!
//! Settlement and pricing talk to storage only through [`OrderStore`] and
//! [`OfferStore`]. `PgStore` backs them with PostgreSQL; `MemoryStore` keeps
//! everything in process with the same compare-and-set semantics.

pub mod memory;
pub mod notifications;
pub mod offers;
pub mod orders;
pub mod pg;
pub mod products;

use async_trait::async_trait;
use shared::models::{
    CategoryOffer, GlobalSaleConfig, Notification, NotificationCreate, NotificationKind, Order,
    Product,
};

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("record already exists: {0}")]
    Duplicate(String),
}

impl StoreError {
    pub(crate) fn corrupt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields written by the paid transition
#[derive(Debug, Clone)]
pub struct PaidPatch {
    pub gateway_order_ref: String,
    pub gateway_payment_ref: String,
    pub gateway_signature: String,
    /// `None` keeps the stored value
    pub invoice_url: Option<String>,
    pub paid_at: i64,
}

impl PaidPatch {
    /// Apply the patch to an in-memory order (status `confirmed`, payment `paid`)
    pub fn apply(&self, order: &mut Order) {
        order.status = shared::models::OrderStatus::Confirmed;
        order.payment_status = shared::models::PaymentStatus::Paid;
        order.gateway_order_ref = Some(self.gateway_order_ref.clone());
        order.gateway_payment_ref = Some(self.gateway_payment_ref.clone());
        order.gateway_signature = Some(self.gateway_signature.clone());
        if let Some(url) = &self.invoice_url {
            order.invoice_url = Some(url.clone());
        }
        order.paid_at = Some(self.paid_at);
    }
}

/// Order and notification persistence
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Option<Order>>;

    /// Apply `patch` only while the order is not yet paid.
    ///
    /// Returns `true` when this call performed the transition, `false` when
    /// the order was already paid (or vanished).
    async fn conditional_update(&self, id: &str, patch: &PaidPatch) -> StoreResult<bool>;

    /// Bind a gateway order to an unpaid order that has none yet.
    ///
    /// Returns `false` when the order is missing, paid, or already bound.
    async fn attach_gateway_order(&self, id: &str, gateway_order_ref: &str) -> StoreResult<bool>;

    async fn find_notification_by_order(
        &self,
        order_id: &str,
        kind: NotificationKind,
    ) -> StoreResult<Option<Notification>>;

    /// Insert a notification unless one of the same kind already exists for
    /// the order. Returns `None` when an existing one suppressed the insert.
    async fn create_notification(
        &self,
        data: NotificationCreate,
        now: i64,
    ) -> StoreResult<Option<Notification>>;

    async fn create_order(&self, order: &Order) -> StoreResult<()>;

    /// Latest notifications (newest first) plus the unread counter
    async fn list_notifications(&self, limit: i64) -> StoreResult<(Vec<Notification>, i64)>;

    /// Returns `false` when the notification does not exist
    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool>;
}

/// Offer, sale switch and product lookups
#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn list_category_offers(&self) -> StoreResult<Vec<CategoryOffer>>;

    async fn get_global_sale_config(&self) -> StoreResult<Option<GlobalSaleConfig>>;

    async fn upsert_category_offer(&self, offer: &CategoryOffer) -> StoreResult<()>;

    /// Returns `false` when no offer existed for the category
    async fn delete_category_offer(&self, category: &str) -> StoreResult<bool>;

    async fn put_global_sale_config(&self, config: &GlobalSaleConfig) -> StoreResult<()>;

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>>;
}
