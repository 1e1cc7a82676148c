use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use shared::models::Order;

use super::{ChannelError, NotificationChannel, alert_lines};

const SUBJECT: &str = "New Paid Order Received";

/// Admin alert email via SES
pub struct SesEmailChannel {
    ses: SesClient,
    from: String,
    to: Option<String>,
}

impl SesEmailChannel {
    pub fn new(ses: SesClient, from: impl Into<String>, to: Option<String>) -> Self {
        Self {
            ses,
            from: from.into(),
            to,
        }
    }
}

fn body_text(order: &Order) -> String {
    let mut text = String::from("A new order has been successfully paid on your store.\n\n");
    for line in alert_lines(order) {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

#[async_trait]
impl NotificationChannel for SesEmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, order: &Order) -> Result<(), ChannelError> {
        let to = self.to.as_deref().ok_or(ChannelError::NotConfigured("email"))?;

        let subject = Content::builder()
            .data(SUBJECT)
            .build()
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        let text = Content::builder()
            .data(body_text(order))
            .build()
            .map_err(|e| ChannelError::Transport(e.to_string()))?;
        let body = Body::builder().text(text).build();
        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        tracing::info!(to = to, order_id = %order.id, "Paid order email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_lists_order_fields() {
        let mut order = Order::new_pending("ord-7", None, "buyer@example.com", vec![], None, 0);
        order.total_amount = 900;
        let text = body_text(&order);
        assert!(text.starts_with("A new order has been successfully paid"));
        assert!(text.contains("Order ID: ord-7"));
        assert!(text.contains("Amount: ₹900"));
        assert!(text.contains("Payment ID: -"));
    }
}
