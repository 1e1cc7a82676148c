use std::sync::Arc;
use std::time::Duration;

use shared::models::{NotificationCreate, NotificationKind, Order};
use shared::util::now_millis;

use super::{SettlementError, SettlementOutcome, SettlementRequest};
use crate::db::{OrderStore, PaidPatch};
use crate::invoice::{InvoiceError, InvoiceRenderer, object_key};
use crate::notify::NotificationFanout;
use crate::payment;
use crate::storage::{ObjectStorage, StorageError};

const NOTIFICATION_TITLE: &str = "New Order Received";

#[derive(Debug, Clone)]
pub struct SettlementOptions {
    /// Gateway key secret the callback signature is checked against
    pub payment_secret: String,
    /// Budget for invoice render + upload together
    pub invoice_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
enum ArtifactError {
    #[error(transparent)]
    Render(#[from] InvoiceError),
    #[error(transparent)]
    Upload(#[from] StorageError),
}

/// Idempotent UNPAID → PAID transition for one order per call
pub struct SettlementPipeline {
    orders: Arc<dyn OrderStore>,
    renderer: Arc<dyn InvoiceRenderer>,
    storage: Arc<dyn ObjectStorage>,
    fanout: NotificationFanout,
    options: SettlementOptions,
}

impl SettlementPipeline {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        renderer: Arc<dyn InvoiceRenderer>,
        storage: Arc<dyn ObjectStorage>,
        fanout: NotificationFanout,
        options: SettlementOptions,
    ) -> Self {
        Self {
            orders,
            renderer,
            storage,
            fanout,
            options,
        }
    }

    pub async fn settle(
        &self,
        req: &SettlementRequest,
    ) -> Result<SettlementOutcome, SettlementError> {
        if let Some(field) = req.missing_field() {
            return Err(SettlementError::Malformed(field));
        }

        // Nothing is read or written for a forged callback
        if !payment::verify(
            &req.gateway_order_ref,
            &req.gateway_payment_ref,
            &req.signature,
            &self.options.payment_secret,
        ) {
            tracing::warn!(
                order_id = %req.order_id,
                gateway_order_ref = %req.gateway_order_ref,
                gateway_payment_ref = %req.gateway_payment_ref,
                "Payment signature mismatch, possible forged callback"
            );
            return Err(SettlementError::InvalidSignature);
        }

        let order = self
            .orders
            .get(&req.order_id)
            .await?
            .ok_or_else(|| SettlementError::OrderNotFound(req.order_id.clone()))?;

        // A genuine payment for one order must not settle another
        if order.gateway_order_ref.as_deref() != Some(req.gateway_order_ref.as_str()) {
            tracing::warn!(
                order_id = %order.id,
                expected = order.gateway_order_ref.as_deref().unwrap_or("-"),
                gateway_order_ref = %req.gateway_order_ref,
                "Gateway order does not match the stored order"
            );
            return Err(SettlementError::GatewayOrderMismatch(order.id));
        }

        if order.is_paid() {
            tracing::info!(order_id = %order.id, "Order already paid, replaying");
            return Ok(replay(order));
        }

        let mut patch = PaidPatch {
            gateway_order_ref: req.gateway_order_ref.clone(),
            gateway_payment_ref: req.gateway_payment_ref.clone(),
            gateway_signature: req.signature.clone(),
            invoice_url: None,
            paid_at: now_millis(),
        };

        // Render against the paid view so the invoice carries payment details
        let mut paid = order;
        patch.apply(&mut paid);
        patch.invoice_url = self.produce_invoice(&paid).await;

        if !self.orders.conditional_update(&paid.id, &patch).await? {
            tracing::info!(order_id = %paid.id, "Lost settlement race, replaying stored result");
            let current = self
                .orders
                .get(&paid.id)
                .await?
                .ok_or_else(|| SettlementError::OrderNotFound(paid.id.clone()))?;
            return Ok(replay(current));
        }
        if let Some(url) = &patch.invoice_url {
            paid.invoice_url = Some(url.clone());
        }

        tracing::info!(
            order_id = %paid.id,
            amount = paid.total_amount,
            gateway_payment_ref = %req.gateway_payment_ref,
            "Order settled"
        );

        self.record_notification(&paid).await;
        let invoice_url = paid.invoice_url.clone();
        let order_id = paid.id.clone();
        self.fanout.dispatch(paid);

        Ok(SettlementOutcome {
            order_id,
            invoice_url,
            replayed: false,
        })
    }

    /// Render and upload under the time budget; any failure yields `None`
    async fn produce_invoice(&self, order: &Order) -> Option<String> {
        let work = async {
            let document = self.renderer.render(order).await?;
            let url = self.storage.put(&object_key(order), &document).await?;
            Ok::<_, ArtifactError>(url)
        };

        match tokio::time::timeout(self.options.invoice_timeout, work).await {
            Ok(Ok(url)) => Some(url),
            Ok(Err(e)) => {
                tracing::error!(order_id = %order.id, error = %e, "Invoice generation failed");
                None
            }
            Err(_) => {
                tracing::error!(
                    order_id = %order.id,
                    timeout_ms = self.options.invoice_timeout.as_millis() as u64,
                    "Invoice generation timed out"
                );
                None
            }
        }
    }

    /// At most one `new_order` notification per order; failures are logged
    async fn record_notification(&self, order: &Order) {
        match self
            .orders
            .find_notification_by_order(&order.id, NotificationKind::NewOrder)
            .await
        {
            Ok(Some(_)) => {
                tracing::debug!(order_id = %order.id, "Notification already exists");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "Notification lookup failed");
                return;
            }
        }

        let data = NotificationCreate {
            kind: NotificationKind::NewOrder,
            title: NOTIFICATION_TITLE.to_string(),
            message: format!("Order #{} paid successfully", order.short_id()),
            order_id: order.id.clone(),
        };
        match self.orders.create_notification(data, now_millis()).await {
            Ok(Some(n)) => tracing::debug!(
                order_id = %order.id,
                notification_id = %n.id,
                "Notification created"
            ),
            Ok(None) => tracing::debug!(order_id = %order.id, "Notification already exists"),
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "Failed to create notification")
            }
        }
    }
}

fn replay(order: Order) -> SettlementOutcome {
    SettlementOutcome {
        order_id: order.id,
        invoice_url: order.invoice_url,
        replayed: true,
    }
}
