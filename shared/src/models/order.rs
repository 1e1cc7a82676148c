//! Order Model
//!
//! Orders are created at checkout with `pending/pending` and transitioned to
//! `confirmed/paid` exactly once by payment settlement.

use serde::{Deserialize, Serialize};

/// Fulfillment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

/// Order line item (snapshot taken at checkout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    /// Title snapshot
    pub title: String,
    /// Unit price snapshot (integer currency unit)
    pub price: i64,
    pub quantity: i32,
    /// Free-form customization (engraving text, uploaded image, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<serde_json::Value>,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Shipping address snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: Option<String>,
    pub user_email: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
    /// Total amount (integer currency unit)
    pub total_amount: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub gateway_order_ref: Option<String>,
    pub gateway_payment_ref: Option<String>,
    pub gateway_signature: Option<String>,
    pub invoice_url: Option<String>,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}

impl Order {
    /// New checkout order: `pending/pending`, total derived from the lines
    pub fn new_pending(
        id: impl Into<String>,
        user_id: Option<String>,
        user_email: impl Into<String>,
        items: Vec<OrderItem>,
        shipping_address: Option<ShippingAddress>,
        now: i64,
    ) -> Self {
        let total_amount = items.iter().map(OrderItem::line_total).sum();
        Self {
            id: id.into(),
            user_id,
            user_email: user_email.into(),
            items,
            shipping_address,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            gateway_order_ref: None,
            gateway_payment_ref: None,
            gateway_signature: None,
            invoice_url: None,
            paid_at: None,
            created_at: now,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// First 8 characters of the id, used in invoice numbers and alerts
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: i64, quantity: i32) -> OrderItem {
        OrderItem {
            product_id: "p1".to_string(),
            title: "Rose bouquet".to_string(),
            price,
            quantity,
            customization: None,
        }
    }

    #[test]
    fn test_new_pending_sums_lines() {
        let order = Order::new_pending(
            "ord-1",
            None,
            "buyer@example.com",
            vec![item(500, 2), item(250, 1)],
            None,
            0,
        );
        assert_eq!(order.total_amount, 1250);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(!order.is_paid());
    }

    #[test]
    fn test_short_id() {
        let order = Order::new_pending("65f1a2b3c4d5e6f7", None, "a@b.c", vec![], None, 0);
        assert_eq!(order.short_id(), "65f1a2b3");
        let order = Order::new_pending("abc", None, "a@b.c", vec![], None, 0);
        assert_eq!(order.short_id(), "abc");
    }

    #[test]
    fn test_status_db_roundtrip() {
        for status in [OrderStatus::Pending, OrderStatus::Confirmed, OrderStatus::Cancelled] {
            assert_eq!(OrderStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(PaymentStatus::from_db("paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::from_db("PAID"), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Paid).unwrap(),
            "\"paid\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
    }
}
