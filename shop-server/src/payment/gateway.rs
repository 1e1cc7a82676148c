//! Gateway order creation (REST, no SDK)
//!
//! Before checkout the storefront asks the gateway for an order id bound to
//! the stored order total. That id is what later comes back signed in the
//! payment callback.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";
pub const CURRENCY: &str = "INR";

/// Order as issued by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Minor units (paise)
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected by gateway ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected gateway response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id the checkout widget is opened with
    fn key_id(&self) -> &str;

    async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError>;
}

/// Razorpay Orders API client
pub struct RazorpayGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    api_base: String,
}

impl RazorpayGateway {
    pub fn new(key_id: String, key_secret: String, api_base: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            key_id,
            key_secret,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(
        &self,
        amount_minor: i64,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        let resp = self
            .client
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&serde_json::json!({
                "amount": amount_minor,
                "currency": CURRENCY,
                "receipt": receipt,
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
        parse_order(&body)
    }
}

fn parse_order(resp: &serde_json::Value) -> Result<GatewayOrder, GatewayError> {
    let id = resp["id"]
        .as_str()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GatewayError::MalformedResponse(format!("missing id: {resp}")))?;
    Ok(GatewayOrder {
        id: id.to_string(),
        amount: resp["amount"].as_i64().unwrap_or_default(),
        currency: resp["currency"].as_str().unwrap_or(CURRENCY).to_string(),
    })
}

/// Whole rupees to paise; `None` on overflow or a non-positive total
pub fn to_minor_units(amount: i64) -> Option<i64> {
    amount.checked_mul(100).filter(|minor| *minor > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        let resp = serde_json::json!({
            "id": "order_Nx1",
            "entity": "order",
            "amount": 210000,
            "currency": "INR",
            "receipt": "ord-1",
            "status": "created",
        });
        assert_eq!(
            parse_order(&resp).unwrap(),
            GatewayOrder {
                id: "order_Nx1".to_string(),
                amount: 210000,
                currency: "INR".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_error_body() {
        let resp = serde_json::json!({
            "error": { "code": "BAD_REQUEST_ERROR", "description": "amount too small" }
        });
        assert!(matches!(
            parse_order(&resp),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(2100), Some(210000));
        assert_eq!(to_minor_units(0), None);
        assert_eq!(to_minor_units(i64::MAX), None);
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let gateway = RazorpayGateway::new(
            "rzp_test_key".to_string(),
            "secret".to_string(),
            "http://127.0.0.1:1/",
        );
        assert!(matches!(
            gateway.create_order(100, "ord-1").await,
            Err(GatewayError::Transport(_))
        ));
    }
}
