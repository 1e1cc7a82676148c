//! Storefront pricing service
//!
//! Loads products and the (cached) offer snapshot, then delegates to the pure
//! resolver in `shared::pricing`. Admin writes to offers go through here so
//! the cache is dropped as soon as they land.

mod cache;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CategoryOffer, CategoryOfferUpsert, GlobalSaleConfig, GlobalSaleConfigUpdate, Product,
};
use shared::pricing::{CartQuote, PriceResolution, quote_cart, resolve_price};

pub use cache::{OfferCache, OfferSnapshot};

use crate::db::{OfferStore, StoreResult};
use crate::error::ServiceResult;

/// One requested cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i32,
}

/// Product with its resolved price
#[derive(Debug, Clone, Serialize)]
pub struct PricedProduct {
    pub product: Product,
    #[serde(flatten)]
    pub resolution: PriceResolution,
}

/// Cart quote plus the products it was priced from
pub struct PricedCart {
    pub quote: CartQuote,
    pub products: Vec<Product>,
}

#[derive(Clone)]
pub struct PricingService {
    store: Arc<dyn OfferStore>,
    cache: OfferCache,
}

impl PricingService {
    pub fn new(store: Arc<dyn OfferStore>, cache: OfferCache) -> Self {
        Self { store, cache }
    }

    pub async fn snapshot(&self) -> StoreResult<Arc<OfferSnapshot>> {
        if let Some(snapshot) = self.cache.get().await {
            return Ok(snapshot);
        }
        let snapshot = Arc::new(OfferSnapshot {
            category_offers: self.store.list_category_offers().await?,
            sale_config: self.store.get_global_sale_config().await?,
        });
        self.cache.put(snapshot.clone()).await;
        Ok(snapshot)
    }

    async fn product(&self, id: &str) -> ServiceResult<Product> {
        self.store.get_product(id).await?.ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound)
                .with_detail("product_id", id)
                .into()
        })
    }

    pub async fn price_product(&self, id: &str, now: i64) -> ServiceResult<PricedProduct> {
        let product = self.product(id).await?;
        let snapshot = self.snapshot().await?;
        let resolution = resolve_price(
            &product,
            &snapshot.category_offers,
            snapshot.sale_config.as_ref(),
            now,
        );
        Ok(PricedProduct {
            product,
            resolution,
        })
    }

    /// Price every line against one snapshot and one `now`
    pub async fn quote(&self, lines: &[CartLine], now: i64) -> ServiceResult<PricedCart> {
        if lines.is_empty() {
            return Err(AppError::with_message(ErrorCode::OrderEmpty, "Cart is empty").into());
        }
        let mut products = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity < 1 {
                return Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    "quantity must be at least 1",
                )
                .with_detail("product_id", line.product_id.as_str())
                .into());
            }
            products.push(self.product(&line.product_id).await?);
        }

        let snapshot = self.snapshot().await?;
        let quote = quote_cart(
            products.iter().zip(lines).map(|(p, l)| (p, l.quantity)),
            &snapshot.category_offers,
            snapshot.sale_config.as_ref(),
            now,
        );
        Ok(PricedCart { quote, products })
    }

    // ========== Offer administration ==========

    pub async fn list_category_offers(&self) -> ServiceResult<Vec<CategoryOffer>> {
        Ok(self.store.list_category_offers().await?)
    }

    pub async fn upsert_category_offer(
        &self,
        payload: CategoryOfferUpsert,
        now: i64,
    ) -> ServiceResult<CategoryOffer> {
        payload.validate()?;
        let offer = payload.into_offer(now);
        self.store.upsert_category_offer(&offer).await?;
        self.cache.invalidate().await;
        tracing::info!(
            category = %offer.category,
            is_flash = offer.is_flash,
            "Category offer saved"
        );
        Ok(offer)
    }

    pub async fn delete_category_offer(&self, category: &str) -> ServiceResult<()> {
        if !self.store.delete_category_offer(category).await? {
            return Err(AppError::new(ErrorCode::CategoryOfferNotFound)
                .with_detail("category", category)
                .into());
        }
        self.cache.invalidate().await;
        tracing::info!(category = %category, "Category offer deleted");
        Ok(())
    }

    /// Stored configuration, or an inactive placeholder when none exists
    pub async fn sale_config(&self, now: i64) -> ServiceResult<GlobalSaleConfig> {
        Ok(self
            .store
            .get_global_sale_config()
            .await?
            .unwrap_or_else(|| GlobalSaleConfig::inactive_default(now)))
    }

    pub async fn put_sale_config(
        &self,
        payload: GlobalSaleConfigUpdate,
        now: i64,
    ) -> ServiceResult<GlobalSaleConfig> {
        payload.validate()?;
        let config = payload.into_config(now);
        self.store.put_global_sale_config(&config).await?;
        self.cache.invalidate().await;
        tracing::info!(active = config.active, "Global sale config saved");
        Ok(config)
    }
}
