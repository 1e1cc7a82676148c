//! Storefront pricing queries

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use shared::pricing::CartQuote;
use shared::util::now_millis;

use super::ApiResult;
use crate::pricing::{CartLine, PricedProduct};
use crate::state::AppState;

/// GET /api/products/{id}/price
pub async fn get_product_price(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> ApiResult<PricedProduct> {
    let priced = state.pricing.price_product(&product_id, now_millis()).await?;
    Ok(Json(priced))
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub items: Vec<CartLine>,
}

/// POST /api/cart/quote
pub async fn quote_cart(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<CartQuote> {
    let priced = state.pricing.quote(&req.items, now_millis()).await?;
    Ok(Json(priced.quote))
}
