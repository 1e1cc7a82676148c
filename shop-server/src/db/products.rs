use shared::models::{Product, ProductOffer};
use sqlx::PgPool;

use super::StoreResult;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    title: String,
    price: i64,
    category: String,
    offer_price: Option<i64>,
    offer_start_at: Option<i64>,
    offer_end_at: Option<i64>,
    offer_label: Option<String>,
    offer_is_flash: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        // An offer needs all three of price/start/end; partial rows carry no offer
        let offer = match (row.offer_price, row.offer_start_at, row.offer_end_at) {
            (Some(price), Some(start_at), Some(end_at)) => Some(ProductOffer {
                price,
                start_at,
                end_at,
                label: row.offer_label,
                is_flash: row.offer_is_flash,
            }),
            _ => None,
        };
        Product {
            id: row.id,
            title: row.title,
            price: row.price,
            category: row.category,
            offer,
        }
    }
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> StoreResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(
        "SELECT id, title, price, category, offer_price, offer_start_at, offer_end_at,
            offer_label, offer_is_flash
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Product::from))
}
