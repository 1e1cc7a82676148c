use std::time::Duration;

use async_trait::async_trait;
use shared::models::Order;

use super::{ChannelError, NotificationChannel, alert_lines};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Admin chat alert via the Telegram Bot API (`sendMessage`)
pub struct TelegramChannel {
    client: reqwest::Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramChannel {
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            bot_token,
            chat_id,
        }
    }
}

fn message_text(order: &Order) -> String {
    let mut text = String::from("🛒 NEW ORDER PAID\n");
    for line in alert_lines(order) {
        text.push('\n');
        text.push_str(&line);
    }
    text
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, order: &Order) -> Result<(), ChannelError> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return Err(ChannelError::NotConfigured("telegram"));
        };

        let resp = self
            .client
            .post(format!("{TELEGRAM_API}/bot{token}/sendMessage"))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": message_text(order),
            }))
            .send()
            .await
            .map_err(|e| ChannelError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChannelError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
