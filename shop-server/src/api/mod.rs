//! HTTP API for shop-server

pub mod health;
pub mod notifications;
pub mod offers;
pub mod orders;
pub mod payments;
pub mod pricing;

use axum::routing::{delete, get, patch, post, put};
use axum::{Router, middleware};
use shared::error::AppError;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Storefront (no auth)
    let storefront = Router::new()
        .route("/api/products/{id}/price", get(pricing::get_product_price))
        .route("/api/cart/quote", post(pricing::quote_cart))
        .route("/api/orders", post(orders::create_order))
        .route("/api/category-offers", get(offers::list_category_offers))
        .route("/api/sale-config", get(offers::get_sale_config));

    // Gateway order + callback (signature-verified in the pipeline)
    let payments = Router::new()
        .route("/api/payments/order", post(payments::create_gateway_order))
        .route("/api/payments/verify", post(payments::verify_payment));

    // Admin (JWT authenticated)
    let admin = Router::new()
        .route("/api/category-offers", post(offers::upsert_category_offer))
        .route(
            "/api/category-offers/{category}",
            delete(offers::delete_category_offer),
        )
        .route("/api/sale-config", put(offers::put_sale_config))
        .route(
            "/api/admin/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/admin/notifications/{id}/read",
            patch(notifications::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront)
        .merge(payments)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
