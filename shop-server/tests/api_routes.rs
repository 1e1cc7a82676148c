mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shared::models::{GlobalSaleConfig, Order, ProductOffer};
use shared::util::now_millis;
use shop_server::AppState;
use shop_server::api::create_router;
use shop_server::auth::create_token;
use shop_server::db::{MemoryStore, OfferStore, OrderStore};
use shop_server::invoice::PdfInvoiceRenderer;
use shop_server::pricing::{OfferCache, PricingService};
use tokio::sync::mpsc;
use tower::ServiceExt;

use common::*;

const JWT_SECRET: &str = "api-test-jwt-secret";
const HOUR: i64 = 3_600_000;

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
    gateway: Arc<FakeGateway>,
    _alerts: mpsc::Receiver<Order>,
}

fn harness() -> Harness {
    harness_with(FakeGateway::default())
}

fn harness_with(gateway: FakeGateway) -> Harness {
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryStore::new());
    store.insert_product(product("diya", 1000, "Lamps"));
    store.insert_product(product("vase", 600, "Decor"));

    let (pipeline, alerts) = pipeline(
        store.clone(),
        Arc::new(PdfInvoiceRenderer::new("Gift Studio")),
        Arc::new(RecordingStorage::default()),
        Duration::from_secs(5),
    );
    let state = AppState {
        orders: store.clone(),
        pricing: PricingService::new(store.clone(), OfferCache::new(Duration::ZERO)),
        gateway: gateway.clone(),
        settlement: Arc::new(pipeline),
        jwt_secret: JWT_SECRET.to_string(),
    };
    Harness {
        app: create_router(state),
        store,
        gateway,
        _alerts: alerts,
    }
}

fn admin_token() -> String {
    create_token("admin-1", "owner@shop.test", "admin", JWT_SECRET).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let (status, body) = send(&h.app, empty_request("GET", "/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "shop-server");
}

#[tokio::test]
async fn test_verify_payment_settles_order() {
    let h = harness();
    seed_order(h.store.as_ref(), "ord-api-1").await;
    let req = signed_request("ord-api-1");

    let (status, body) = send(
        &h.app,
        json_request("POST", "/api/payments/verify", json!(req), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["invoice_url"],
        format!("{CDN}/invoices/invoice_ord-api-1.pdf")
    );
    assert!(body.get("error").is_none());
    assert!(h.store.get("ord-api-1").await.unwrap().unwrap().is_paid());

    // Gateway retries get the same answer
    let (status, again) = send(
        &h.app,
        json_request("POST", "/api/payments/verify", json!(req), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["invoice_url"], body["invoice_url"]);
}

#[tokio::test]
async fn test_verify_payment_rejections() {
    let h = harness();
    seed_order(h.store.as_ref(), "ord-api-2").await;

    let mut forged = signed_request("ord-api-2");
    forged.signature = "00".repeat(32);
    let (status, body) = send(
        &h.app,
        json_request("POST", "/api/payments/verify", json!(forged), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid Signature");
    assert!(!h.store.get("ord-api-2").await.unwrap().unwrap().is_paid());

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/payments/verify",
            json!(signed_request("ord-nowhere")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/payments/verify",
            json!({ "order_id": "ord-api-2" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_verify_payment_for_other_order_rejected() {
    let h = harness();
    seed_order(h.store.as_ref(), "ord-cheap").await;
    seed_order(h.store.as_ref(), "ord-expensive").await;

    let mut req = signed_request("ord-cheap");
    req.order_id = "ord-expensive".to_string();
    let (status, body) = send(
        &h.app,
        json_request("POST", "/api/payments/verify", json!(req), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Payment does not belong to this order");
    assert!(!h.store.get("ord-expensive").await.unwrap().unwrap().is_paid());
}

#[tokio::test]
async fn test_checkout_gateway_order_and_settle() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/orders",
            json!({
                "user_email": "buyer@example.com",
                "items": [{ "product_id": "diya", "quantity": 2 }],
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let open = json!({ "order_id": id });
    let (status, body) = send(
        &h.app,
        json_request("POST", "/api/payments/order", open.clone(), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gateway_order_ref"], format!("order_{id}"));
    assert_eq!(body["amount"], 200_000);
    assert_eq!(body["currency"], "INR");
    assert_eq!(body["key_id"], "rzp_test_key_id");

    // Reopening checkout reuses the binding
    let (status, again) = send(
        &h.app,
        json_request("POST", "/api/payments/order", open.clone(), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["gateway_order_ref"], body["gateway_order_ref"]);
    assert_eq!(h.gateway.calls(), 1);

    let (status, settled) = send(
        &h.app,
        json_request("POST", "/api/payments/verify", json!(signed_request(&id)), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["success"], true);

    let (status, _) = send(&h.app, json_request("POST", "/api/payments/order", open, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_gateway_order_rejections() {
    let h = harness();
    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/api/payments/order",
            json!({ "order_id": "ord-nowhere" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(h.gateway.calls(), 0);

    let h = harness_with(FakeGateway {
        down: true,
        ..FakeGateway::default()
    });
    h.store.create_order(&pending_order("ord-offline")).await.unwrap();
    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/api/payments/order",
            json!({ "order_id": "ord-offline" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let stored = h.store.get("ord-offline").await.unwrap().unwrap();
    assert_eq!(stored.gateway_order_ref, None);
}

#[tokio::test]
async fn test_product_price_follows_admin_offers() {
    let h = harness();
    let token = admin_token();
    let now = now_millis();

    let (status, body) = send(&h.app, empty_request("GET", "/api/products/diya/price", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_price"], 1000);
    assert_eq!(body["is_sale_active"], false);

    let (status, _) = send(
        &h.app,
        json_request(
            "PUT",
            "/api/sale-config",
            json!({
                "active": true,
                "banner_text": "Diwali Sale",
                "banner_subtext": null,
                "start_at": now - HOUR,
                "end_at": now + HOUR,
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/api/category-offers",
            json!({
                "category": "Lamps",
                "discount_percent": 20.0,
                "fixed_price": null,
                "start_at": now - HOUR,
                "end_at": now + HOUR,
                "label": null,
                "is_flash": true,
            }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&h.app, empty_request("GET", "/api/products/diya/price", None)).await;
    assert_eq!(body["current_price"], 800);
    assert_eq!(body["is_sale_active"], true);
    assert_eq!(body["is_flash"], true);

    let (status, _) = send(
        &h.app,
        empty_request("DELETE", "/api/category-offers/Lamps", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&h.app, empty_request("GET", "/api/products/diya/price", None)).await;
    assert_eq!(body["current_price"], 1000);
}

#[tokio::test]
async fn test_unknown_product_price() {
    let h = harness();
    let (status, _) = send(&h.app, empty_request("GET", "/api/products/nope/price", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cart_quote() {
    let h = harness();
    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/cart/quote",
            json!({ "items": [
                { "product_id": "diya", "quantity": 2 },
                { "product_id": "vase", "quantity": 1 },
            ]}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2600);
    assert_eq!(body["lines"].as_array().unwrap().len(), 2);

    let (status, _) = send(
        &h.app,
        json_request("POST", "/api/cart/quote", json!({ "items": [] }), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_prices_server_side() {
    let h = harness();
    let now = now_millis();
    let mut lamp = product("flash-lamp", 1000, "Lamps");
    lamp.offer = Some(ProductOffer {
        price: 750,
        start_at: now - HOUR,
        end_at: now + HOUR,
        label: None,
        is_flash: true,
    });
    h.store.insert_product(lamp);
    h.store
        .put_global_sale_config(&GlobalSaleConfig {
            active: true,
            banner_text: "Sale".to_string(),
            banner_subtext: None,
            start_at: now - HOUR,
            end_at: now + HOUR,
            updated_at: now,
        })
        .await
        .unwrap();

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            "/api/orders",
            json!({
                "user_email": "buyer@example.com",
                "items": [
                    { "product_id": "flash-lamp", "quantity": 2 },
                    {
                        "product_id": "vase",
                        "quantity": 1,
                        "customization": { "note": "gift wrap" },
                    },
                ],
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total_amount"], 2100);
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["items"][0]["price"], 750);
    assert_eq!(body["items"][1]["customization"]["note"], "gift wrap");

    let id = body["id"].as_str().unwrap();
    let stored = h.store.get(id).await.unwrap().unwrap();
    assert_eq!(stored.total_amount, 2100);
}

#[tokio::test]
async fn test_checkout_unknown_product() {
    let h = harness();
    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/api/orders",
            json!({
                "user_email": "buyer@example.com",
                "items": [{ "product_id": "ghost", "quantity": 1 }],
            }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_require_admin_token() {
    let h = harness();

    let (status, _) = send(&h.app, empty_request("GET", "/api/admin/notifications", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &h.app,
        empty_request("GET", "/api/admin/notifications", Some("not-a-jwt")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer = create_token("user-9", "buyer@example.com", "customer", JWT_SECRET).unwrap();
    let (status, _) = send(
        &h.app,
        empty_request("GET", "/api/admin/notifications", Some(&customer)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Public reads stay open
    let (status, body) = send(&h.app, empty_request("GET", "/api/category-offers", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(
        &h.app,
        empty_request("DELETE", "/api/category-offers/Lamps", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notification_bell() {
    let h = harness();
    let token = admin_token();
    seed_order(h.store.as_ref(), "ord-bell-1").await;
    send(
        &h.app,
        json_request(
            "POST",
            "/api/payments/verify",
            json!(signed_request("ord-bell-1")),
            None,
        ),
    )
    .await;

    let (status, body) = send(
        &h.app,
        empty_request("GET", "/api/admin/notifications", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 1);
    let notification = &body["notifications"][0];
    assert_eq!(notification["order_id"], "ord-bell-1");
    assert_eq!(notification["kind"], "new_order");

    let id = notification["id"].as_str().unwrap();
    let (status, _) = send(
        &h.app,
        empty_request(
            "PATCH",
            &format!("/api/admin/notifications/{id}/read"),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &h.app,
        empty_request("GET", "/api/admin/notifications", Some(&token)),
    )
    .await;
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["notifications"][0]["is_read"], true);

    let (status, _) = send(
        &h.app,
        empty_request(
            "PATCH",
            "/api/admin/notifications/missing/read",
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
