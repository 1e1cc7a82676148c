use shared::models::{Notification, NotificationCreate, NotificationKind};
use sqlx::PgPool;

use super::{StoreError, StoreResult};

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: String,
    kind: String,
    title: String,
    message: String,
    order_id: String,
    is_read: bool,
    created_at: i64,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::from_db(&row.kind)
            .ok_or_else(|| StoreError::corrupt(&row.id, format!("kind '{}'", row.kind)))?;
        Ok(Notification {
            id: row.id,
            kind,
            title: row.title,
            message: row.message,
            order_id: row.order_id,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

pub async fn find_by_order(
    pool: &PgPool,
    order_id: &str,
    kind: NotificationKind,
) -> StoreResult<Option<Notification>> {
    let row: Option<NotificationRow> = sqlx::query_as(
        "SELECT id, kind, title, message, order_id, is_read, created_at
         FROM notifications WHERE order_id = $1 AND kind = $2",
    )
    .bind(order_id)
    .bind(kind.as_db())
    .fetch_optional(pool)
    .await?;
    row.map(Notification::try_from).transpose()
}

/// Insert guarded by the `(order_id, kind)` unique constraint
pub async fn create_if_absent(
    pool: &PgPool,
    data: &NotificationCreate,
    now: i64,
) -> StoreResult<Option<Notification>> {
    let row: Option<NotificationRow> = sqlx::query_as(
        "INSERT INTO notifications (id, kind, title, message, order_id, is_read, created_at)
         VALUES ($1, $2, $3, $4, $5, FALSE, $6)
         ON CONFLICT (order_id, kind) DO NOTHING
         RETURNING id, kind, title, message, order_id, is_read, created_at",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(data.kind.as_db())
    .bind(&data.title)
    .bind(&data.message)
    .bind(&data.order_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    row.map(Notification::try_from).transpose()
}

pub async fn list_latest(pool: &PgPool, limit: i64) -> StoreResult<Vec<Notification>> {
    let rows: Vec<NotificationRow> = sqlx::query_as(
        "SELECT id, kind, title, message, order_id, is_read, created_at
         FROM notifications ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Notification::try_from).collect()
}

pub async fn count_unread(pool: &PgPool) -> StoreResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE NOT is_read")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn mark_read(pool: &PgPool, id: &str) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
