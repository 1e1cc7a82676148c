//! Payment gateway endpoints
//!
//! - POST /api/payments/order: opens a gateway order for a pending order
//! - POST /api/payments/verify: settles an order after the customer pays

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::Order;

use crate::error::{ServiceError, ServiceResult};
use crate::payment::{CURRENCY, to_minor_units};
use crate::settlement::SettlementRequest;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GatewayOrderRequest {
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct GatewayOrderResponse {
    pub gateway_order_ref: String,
    /// Minor units (paise)
    pub amount: i64,
    pub currency: &'static str,
    pub key_id: String,
}

async fn load_unpaid(state: &AppState, order_id: &str) -> ServiceResult<Order> {
    let order = state.orders.get(order_id).await?.ok_or_else(|| {
        AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
    })?;
    if order.is_paid() {
        return Err(AppError::new(ErrorCode::OrderAlreadyPaid)
            .with_detail("order_id", order_id)
            .into());
    }
    Ok(order)
}

/// POST /api/payments/order
///
/// The charged amount is always the stored order total. An order is bound to
/// at most one gateway order; repeated calls return the existing binding.
pub async fn create_gateway_order(
    State(state): State<AppState>,
    Json(req): Json<GatewayOrderRequest>,
) -> ServiceResult<Json<GatewayOrderResponse>> {
    let order = load_unpaid(&state, &req.order_id).await?;
    let amount = to_minor_units(order.total_amount).ok_or_else(|| {
        AppError::new(ErrorCode::OrderEmpty).with_detail("order_id", order.id.as_str())
    })?;
    let respond = |gateway_order_ref: String| {
        Json(GatewayOrderResponse {
            gateway_order_ref,
            amount,
            currency: CURRENCY,
            key_id: state.gateway.key_id().to_string(),
        })
    };

    if let Some(existing) = order.gateway_order_ref {
        return Ok(respond(existing));
    }

    let created = state
        .gateway
        .create_order(amount, &order.id)
        .await
        .map_err(|e| {
            tracing::error!(order_id = %order.id, error = %e, "Gateway order creation failed");
            AppError::new(ErrorCode::PaymentGatewayUnavailable)
        })?;

    if state
        .orders
        .attach_gateway_order(&order.id, &created.id)
        .await?
    {
        tracing::info!(
            order_id = %order.id,
            gateway_order_ref = %created.id,
            amount,
            "Gateway order created"
        );
        return Ok(respond(created.id));
    }

    // Lost to a concurrent request (or the order was paid meanwhile)
    let current = load_unpaid(&state, &order.id).await?;
    current
        .gateway_order_ref
        .map(respond)
        .ok_or_else(|| ServiceError::Db("gateway order binding not persisted".into()))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResponse {
    fn failure(err: &AppError) -> (StatusCode, Json<Self>) {
        (
            err.http_status(),
            Json(Self {
                success: false,
                invoice_url: None,
                error: Some(err.message.clone()),
            }),
        )
    }
}

pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> (StatusCode, Json<VerifyResponse>) {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Malformed payment callback");
            let err =
                AppError::with_message(ErrorCode::PaymentPayloadInvalid, rejection.body_text());
            return VerifyResponse::failure(&err);
        }
    };

    match state.settlement.settle(&req).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(VerifyResponse {
                success: true,
                invoice_url: outcome.invoice_url,
                error: None,
            }),
        ),
        Err(e) => VerifyResponse::failure(&AppError::from(e)),
    }
}
