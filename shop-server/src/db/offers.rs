use shared::models::{CategoryOffer, GlobalSaleConfig};
use sqlx::PgPool;

use super::StoreResult;

pub async fn list_category_offers(pool: &PgPool) -> StoreResult<Vec<CategoryOffer>> {
    let offers = sqlx::query_as::<_, CategoryOffer>(
        "SELECT category, discount_percent, fixed_price, start_at, end_at, label, is_flash,
            updated_at
         FROM category_offers ORDER BY category",
    )
    .fetch_all(pool)
    .await?;
    Ok(offers)
}

pub async fn upsert_category_offer(pool: &PgPool, offer: &CategoryOffer) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO category_offers
            (category, discount_percent, fixed_price, start_at, end_at, label, is_flash, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (category) DO UPDATE SET
            discount_percent = $2, fixed_price = $3, start_at = $4, end_at = $5,
            label = $6, is_flash = $7, updated_at = $8",
    )
    .bind(&offer.category)
    .bind(offer.discount_percent)
    .bind(offer.fixed_price)
    .bind(offer.start_at)
    .bind(offer.end_at)
    .bind(&offer.label)
    .bind(offer.is_flash)
    .bind(offer.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_category_offer(pool: &PgPool, category: &str) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM category_offers WHERE category = $1")
        .bind(category)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_global_sale_config(pool: &PgPool) -> StoreResult<Option<GlobalSaleConfig>> {
    let config = sqlx::query_as::<_, GlobalSaleConfig>(
        "SELECT active, banner_text, banner_subtext, start_at, end_at, updated_at
         FROM global_sale_config WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(config)
}

pub async fn put_global_sale_config(pool: &PgPool, config: &GlobalSaleConfig) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO global_sale_config
            (id, active, banner_text, banner_subtext, start_at, end_at, updated_at)
         VALUES (1, $1, $2, $3, $4, $5, $6)
         ON CONFLICT (id) DO UPDATE SET
            active = $1, banner_text = $2, banner_subtext = $3,
            start_at = $4, end_at = $5, updated_at = $6",
    )
    .bind(config.active)
    .bind(&config.banner_text)
    .bind(&config.banner_subtext)
    .bind(config.start_at)
    .bind(config.end_at)
    .bind(config.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}
