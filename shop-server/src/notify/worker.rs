//! Alert fan-out worker
//!
//! Consumes paid orders from the mpsc queue and exits when the queue closes.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use shared::models::Order;
use tokio::sync::mpsc;

use super::{ChannelError, NotificationChannel};

pub struct FanoutWorker {
    channels: Vec<Arc<dyn NotificationChannel>>,
    /// Upper bound for a single channel send
    send_timeout: Duration,
}

impl FanoutWorker {
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>, send_timeout: Duration) -> Self {
        Self {
            channels,
            send_timeout,
        }
    }

    /// Run until the queue is closed
    pub async fn run(self, mut rx: mpsc::Receiver<Order>) {
        tracing::info!(channels = self.channels.len(), "Order alert worker started");

        while let Some(order) = rx.recv().await {
            self.deliver(&order).await;
        }

        tracing::info!("Order alert queue closed, worker stopping");
    }

    /// Try every channel concurrently; one failure or hang never skips another
    async fn deliver(&self, order: &Order) {
        let attempts = self.channels.iter().map(|channel| async move {
            let result = tokio::time::timeout(self.send_timeout, channel.send(order)).await;
            (channel.name(), result)
        });

        for (name, result) in join_all(attempts).await {
            match result {
                Ok(Ok(())) => {
                    tracing::info!(order_id = %order.id, channel = name, "Order alert sent");
                }
                Ok(Err(e)) => log_failure(order, name, &e),
                Err(_) => {
                    tracing::error!(
                        order_id = %order.id,
                        channel = name,
                        timeout_ms = self.send_timeout.as_millis() as u64,
                        "Order alert timed out"
                    );
                }
            }
        }
    }
}

fn log_failure(order: &Order, channel: &str, error: &ChannelError) {
    tracing::error!(order_id = %order.id, channel, error = %error, "Order alert failed");
}
