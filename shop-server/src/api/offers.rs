//! Category offers and the global sale switch
//!
//! Reads are public (storefront banner, product badges); writes need an admin token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use shared::models::{CategoryOffer, CategoryOfferUpsert, GlobalSaleConfig, GlobalSaleConfigUpdate};
use shared::util::now_millis;

use super::ApiResult;
use crate::auth::AdminIdentity;
use crate::error::ServiceResult;
use crate::state::AppState;

/// GET /api/category-offers
pub async fn list_category_offers(State(state): State<AppState>) -> ApiResult<Vec<CategoryOffer>> {
    Ok(Json(state.pricing.list_category_offers().await?))
}

/// POST /api/category-offers (upsert by category)
pub async fn upsert_category_offer(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(req): Json<CategoryOfferUpsert>,
) -> ApiResult<CategoryOffer> {
    tracing::info!(admin = %admin.email, category = %req.category, "Upserting category offer");
    let offer = state
        .pricing
        .upsert_category_offer(req, now_millis())
        .await?;
    Ok(Json(offer))
}

/// DELETE /api/category-offers/{category}
pub async fn delete_category_offer(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(category): Path<String>,
) -> ServiceResult<StatusCode> {
    tracing::info!(admin = %admin.email, category = %category, "Deleting category offer");
    state.pricing.delete_category_offer(&category).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sale-config
pub async fn get_sale_config(State(state): State<AppState>) -> ApiResult<GlobalSaleConfig> {
    Ok(Json(state.pricing.sale_config(now_millis()).await?))
}

/// PUT /api/sale-config
pub async fn put_sale_config(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Json(req): Json<GlobalSaleConfigUpdate>,
) -> ApiResult<GlobalSaleConfig> {
    tracing::info!(admin = %admin.email, active = req.active, "Updating global sale config");
    Ok(Json(state.pricing.put_sale_config(req, now_millis()).await?))
}
