//! Checkout order creation
//!
//! Unit prices come from the resolver, never from the client, so the amount
//! charged is the amount the storefront showed.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderItem, ShippingAddress};
use shared::util::now_millis;

use crate::error::ServiceError;
use crate::pricing::CartLine;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutLine {
    pub product_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub customization: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_email: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub items: Vec<CheckoutLine>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    if req.user_email.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "user_email is required",
        ));
    }

    let lines: Vec<CartLine> = req
        .items
        .iter()
        .map(|l| CartLine {
            product_id: l.product_id.clone(),
            quantity: l.quantity,
        })
        .collect();
    let now = now_millis();
    let priced = state.pricing.quote(&lines, now).await?;

    let items = req
        .items
        .into_iter()
        .zip(priced.quote.lines)
        .zip(priced.products)
        .map(|((line, quoted), product)| OrderItem {
            product_id: product.id,
            title: product.title,
            price: quoted.unit_price,
            quantity: quoted.quantity,
            customization: line.customization,
        })
        .collect();

    let order = Order::new_pending(
        uuid::Uuid::new_v4().simple().to_string(),
        req.user_id,
        req.user_email,
        items,
        req.shipping_address,
        now,
    );
    state
        .orders
        .create_order(&order)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(order_id = %order.id, total = order.total_amount, "Order created");
    Ok((StatusCode::CREATED, Json(order)))
}
