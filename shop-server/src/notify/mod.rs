//! Paid-order alert fan-out
//!
//! Settlement hands the paid order to [`NotificationFanout::dispatch`], which
//! queues it on a bounded mpsc channel and returns. A [`FanoutWorker`] task
//! drains the queue and tries every [`NotificationChannel`] independently.
//! Delivery is best effort: no retries, each send is bounded by a timeout
//! and failures are only logged.

mod chat;
mod email;
mod worker;

use async_trait::async_trait;
use shared::models::Order;
use tokio::sync::mpsc;

pub use chat::TelegramChannel;
pub use email::SesEmailChannel;
pub use worker::FanoutWorker;

/// Alert channel error
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("{0} channel is not configured")]
    NotConfigured(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected by provider ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A destination for paid-order alerts
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, order: &Order) -> Result<(), ChannelError>;
}

/// Sending half of the fan-out queue
#[derive(Clone)]
pub struct NotificationFanout {
    tx: mpsc::Sender<Order>,
}

impl NotificationFanout {
    pub fn new(tx: mpsc::Sender<Order>) -> Self {
        Self { tx }
    }

    /// Queue an alert for `order` without waiting for delivery
    pub fn dispatch(&self, order: Order) {
        let order_id = order.id.clone();
        match self.tx.try_send(order) {
            Ok(()) => tracing::debug!(order_id = %order_id, "Order alert queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(order_id = %order_id, "Alert queue full, dropping order alert");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!(order_id = %order_id, "Alert worker stopped, dropping order alert");
            }
        }
    }
}

/// Start a worker over `channels`, returning the dispatch handle
pub fn spawn_fanout(
    channels: Vec<std::sync::Arc<dyn NotificationChannel>>,
    queue_size: usize,
    send_timeout: std::time::Duration,
) -> (NotificationFanout, tokio::task::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(queue_size.max(1));
    let handle = tokio::spawn(FanoutWorker::new(channels, send_timeout).run(rx));
    (NotificationFanout::new(tx), handle)
}

/// Alert body lines shared by every channel
pub(crate) fn alert_lines(order: &Order) -> [String; 4] {
    [
        format!("Order ID: {}", order.id),
        format!("Amount: ₹{}", order.total_amount),
        format!("Customer: {}", order.user_email),
        format!(
            "Payment ID: {}",
            order.gateway_payment_ref.as_deref().unwrap_or("-")
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        let mut order = Order::new_pending("ord-1", None, "buyer@example.com", vec![], None, 0);
        order.total_amount = 1250;
        order.gateway_payment_ref = Some("pay_9".to_string());
        order
    }

    #[test]
    fn test_alert_lines() {
        let lines = alert_lines(&order());
        assert_eq!(lines[0], "Order ID: ord-1");
        assert_eq!(lines[1], "Amount: ₹1250");
        assert_eq!(lines[2], "Customer: buyer@example.com");
        assert_eq!(lines[3], "Payment ID: pay_9");
    }

    #[tokio::test]
    async fn test_dispatch_does_not_block_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let fanout = NotificationFanout::new(tx);
        fanout.dispatch(order());
        fanout.dispatch(order());
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_after_worker_stopped() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        NotificationFanout::new(tx).dispatch(order());
    }
}
