//! Fakes shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    Notification, NotificationCreate, NotificationKind, Order, OrderItem, Product,
};
use shop_server::db::{MemoryStore, OrderStore, PaidPatch, StoreResult};
use shop_server::invoice::{InvoiceDocument, InvoiceError, InvoiceRenderer, PdfInvoiceRenderer};
use shop_server::notify::NotificationFanout;
use shop_server::payment::{self, GatewayError, GatewayOrder, PaymentGateway};
use shop_server::settlement::{SettlementOptions, SettlementPipeline, SettlementRequest};
use shop_server::storage::{ObjectStorage, StorageError};
use tokio::sync::mpsc;

pub const SECRET: &str = "rzp_test_key_secret";
pub const CDN: &str = "https://cdn.shop.test";

/// Delegating store that counts reads and successful paid transitions
pub struct CountingStore {
    pub inner: MemoryStore,
    pub reads: AtomicUsize,
    pub paid_writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            reads: AtomicUsize::new(0),
            paid_writes: AtomicUsize::new(0),
        })
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn paid_writes(&self) -> usize {
        self.paid_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for CountingStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Order>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn conditional_update(&self, id: &str, patch: &PaidPatch) -> StoreResult<bool> {
        let won = self.inner.conditional_update(id, patch).await?;
        if won {
            self.paid_writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(won)
    }

    async fn attach_gateway_order(&self, id: &str, gateway_order_ref: &str) -> StoreResult<bool> {
        self.inner.attach_gateway_order(id, gateway_order_ref).await
    }

    async fn find_notification_by_order(
        &self,
        order_id: &str,
        kind: NotificationKind,
    ) -> StoreResult<Option<Notification>> {
        self.inner.find_notification_by_order(order_id, kind).await
    }

    async fn create_notification(
        &self,
        data: NotificationCreate,
        now: i64,
    ) -> StoreResult<Option<Notification>> {
        self.inner.create_notification(data, now).await
    }

    async fn create_order(&self, order: &Order) -> StoreResult<()> {
        self.inner.create_order(order).await
    }

    async fn list_notifications(&self, limit: i64) -> StoreResult<(Vec<Notification>, i64)> {
        self.inner.list_notifications(limit).await
    }

    async fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        self.inner.mark_notification_read(id).await
    }
}

/// Records uploads and returns CDN URLs
#[derive(Default)]
pub struct RecordingStorage {
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put(&self, key: &str, document: &InvoiceDocument) -> Result<String, StorageError> {
        tokio::task::yield_now().await;
        self.uploads
            .lock()
            .push((key.to_string(), document.body.clone()));
        Ok(format!("{CDN}/{key}"))
    }
}

/// Storage that always fails
pub struct BrokenStorage;

#[async_trait]
impl ObjectStorage for BrokenStorage {
    async fn put(&self, key: &str, _document: &InvoiceDocument) -> Result<String, StorageError> {
        Err(StorageError::Upload {
            key: key.to_string(),
            reason: "bucket unreachable".to_string(),
        })
    }
}

/// Renderer that never finishes inside the budget
pub struct SlowRenderer(pub Duration);

#[async_trait]
impl InvoiceRenderer for SlowRenderer {
    async fn render(&self, order: &Order) -> Result<InvoiceDocument, InvoiceError> {
        tokio::time::sleep(self.0).await;
        PdfInvoiceRenderer::new("Slow Shop").render(order).await
    }
}

/// Renderer that always fails
pub struct FailingRenderer;

#[async_trait]
impl InvoiceRenderer for FailingRenderer {
    async fn render(&self, _order: &Order) -> Result<InvoiceDocument, InvoiceError> {
        Err(InvoiceError::Pdf("font table unavailable".to_string()))
    }
}

/// Gateway that issues `order_{receipt}` ids and counts calls
#[derive(Default)]
pub struct FakeGateway {
    pub calls: AtomicUsize,
    pub down: bool,
}

impl FakeGateway {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn key_id(&self) -> &str {
        "rzp_test_key_id"
    }

    async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        Ok(GatewayOrder {
            id: format!("order_{receipt}"),
            amount: amount_minor,
            currency: payment::CURRENCY.to_string(),
        })
    }
}

pub fn item(product_id: &str, price: i64, quantity: i32) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        title: format!("Item {product_id}"),
        price,
        quantity,
        customization: None,
    }
}

pub fn pending_order(id: &str) -> Order {
    Order::new_pending(
        id,
        Some("user-1".to_string()),
        "buyer@example.com",
        vec![item("p1", 800, 1), item("p2", 250, 2)],
        None,
        1_700_000_000_000,
    )
}

/// Pending order already bound to gateway order `order_{id}`
pub async fn seed_order(store: &dyn OrderStore, id: &str) -> Order {
    let mut order = pending_order(id);
    order.gateway_order_ref = Some(format!("order_{id}"));
    store.create_order(&order).await.unwrap();
    order
}

pub fn signed_request(order_id: &str) -> SettlementRequest {
    let gateway_order_ref = format!("order_{order_id}");
    let gateway_payment_ref = format!("pay_{order_id}");
    SettlementRequest {
        signature: payment::sign(&gateway_order_ref, &gateway_payment_ref, SECRET),
        gateway_order_ref,
        gateway_payment_ref,
        order_id: order_id.to_string(),
    }
}

pub fn pipeline(
    orders: Arc<dyn OrderStore>,
    renderer: Arc<dyn InvoiceRenderer>,
    storage: Arc<dyn ObjectStorage>,
    invoice_timeout: Duration,
) -> (SettlementPipeline, mpsc::Receiver<Order>) {
    let (tx, rx) = mpsc::channel(64);
    let pipeline = SettlementPipeline::new(
        orders,
        renderer,
        storage,
        NotificationFanout::new(tx),
        SettlementOptions {
            payment_secret: SECRET.to_string(),
            invoice_timeout,
        },
    );
    (pipeline, rx)
}

pub fn product(id: &str, price: i64, category: &str) -> Product {
    Product {
        id: id.to_string(),
        title: format!("Product {id}"),
        price,
        category: category.to_string(),
        offer: None,
    }
}
