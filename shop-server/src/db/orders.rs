use shared::models::{Order, OrderItem, OrderStatus, PaymentStatus, ShippingAddress};
use sqlx::PgPool;
use sqlx::types::Json;

use super::{PaidPatch, StoreError, StoreResult};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: Option<String>,
    user_email: String,
    items: Json<Vec<OrderItem>>,
    shipping_address: Option<Json<ShippingAddress>>,
    total_amount: i64,
    status: String,
    payment_status: String,
    gateway_order_ref: Option<String>,
    gateway_payment_ref: Option<String>,
    gateway_signature: Option<String>,
    invoice_url: Option<String>,
    paid_at: Option<i64>,
    created_at: i64,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_db(&row.status)
            .ok_or_else(|| StoreError::corrupt(&row.id, format!("status '{}'", row.status)))?;
        let payment_status = PaymentStatus::from_db(&row.payment_status).ok_or_else(|| {
            StoreError::corrupt(&row.id, format!("payment_status '{}'", row.payment_status))
        })?;
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            user_email: row.user_email,
            items: row.items.0,
            shipping_address: row.shipping_address.map(|a| a.0),
            total_amount: row.total_amount,
            status,
            payment_status,
            gateway_order_ref: row.gateway_order_ref,
            gateway_payment_ref: row.gateway_payment_ref,
            gateway_signature: row.gateway_signature,
            invoice_url: row.invoice_url,
            paid_at: row.paid_at,
            created_at: row.created_at,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, user_email, items, shipping_address, total_amount,
    status, payment_status, gateway_order_ref, gateway_payment_ref, gateway_signature,
    invoice_url, paid_at, created_at";

pub async fn find_by_id(pool: &PgPool, id: &str) -> StoreResult<Option<Order>> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    row.map(Order::try_from).transpose()
}

pub async fn create(pool: &PgPool, order: &Order) -> StoreResult<()> {
    let result = sqlx::query(
        "INSERT INTO orders (id, user_id, user_email, items, shipping_address, total_amount,
            status, payment_status, gateway_order_ref, gateway_payment_ref, gateway_signature,
            invoice_url, paid_at, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(&order.user_email)
    .bind(Json(&order.items))
    .bind(order.shipping_address.as_ref().map(Json))
    .bind(order.total_amount)
    .bind(order.status.as_db())
    .bind(order.payment_status.as_db())
    .bind(&order.gateway_order_ref)
    .bind(&order.gateway_payment_ref)
    .bind(&order.gateway_signature)
    .bind(&order.invoice_url)
    .bind(order.paid_at)
    .bind(order.created_at)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(StoreError::Duplicate(order.id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Paid transition as a single compare-and-set statement
pub async fn mark_paid_if_unpaid(pool: &PgPool, id: &str, patch: &PaidPatch) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE orders SET
            status = $2, payment_status = $3,
            gateway_order_ref = $4, gateway_payment_ref = $5, gateway_signature = $6,
            invoice_url = COALESCE($7, invoice_url), paid_at = $8
         WHERE id = $1 AND payment_status <> $3",
    )
    .bind(id)
    .bind(OrderStatus::Confirmed.as_db())
    .bind(PaymentStatus::Paid.as_db())
    .bind(&patch.gateway_order_ref)
    .bind(&patch.gateway_payment_ref)
    .bind(&patch.gateway_signature)
    .bind(&patch.invoice_url)
    .bind(patch.paid_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Bind the gateway order once, and only while unpaid
pub async fn attach_gateway_order(
    pool: &PgPool,
    id: &str,
    gateway_order_ref: &str,
) -> StoreResult<bool> {
    let result = sqlx::query(
        "UPDATE orders SET gateway_order_ref = $2
         WHERE id = $1 AND payment_status <> $3 AND gateway_order_ref IS NULL",
    )
    .bind(id)
    .bind(gateway_order_ref)
    .bind(PaymentStatus::Paid.as_db())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}
