//! Promotion models: per-category offers and the global sale switch

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Category-level offer (at most one per category, upserted by category key)
///
/// Exactly one of `discount_percent` / `fixed_price` is meaningful; when both
/// are present `fixed_price` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryOffer {
    pub category: String,
    /// Percentage off the base price (20 = 20%)
    pub discount_percent: Option<f64>,
    /// Absolute sale price (integer currency unit)
    pub fixed_price: Option<i64>,
    /// Window start (Unix millis, inclusive)
    pub start_at: i64,
    /// Window end (Unix millis, inclusive)
    pub end_at: i64,
    pub label: Option<String>,
    pub is_flash: bool,
    pub updated_at: i64,
}

/// Upsert category offer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryOfferUpsert {
    pub category: String,
    pub discount_percent: Option<f64>,
    pub fixed_price: Option<i64>,
    pub start_at: i64,
    pub end_at: i64,
    pub label: Option<String>,
    #[serde(default)]
    pub is_flash: bool,
}

impl CategoryOfferUpsert {
    /// Validate the payload before it reaches the offer store
    pub fn validate(&self) -> Result<(), AppError> {
        if self.category.trim().is_empty() {
            return Err(invalid_offer("category must not be empty"));
        }
        if self.start_at >= self.end_at {
            return Err(invalid_offer("start_at must be before end_at"));
        }
        match (self.discount_percent, self.fixed_price) {
            (None, None) => Err(invalid_offer(
                "either discount_percent or fixed_price is required",
            )),
            (Some(_), Some(_)) => Err(invalid_offer(
                "discount_percent and fixed_price are mutually exclusive",
            )),
            (Some(pct), None) if !pct.is_finite() || pct <= 0.0 || pct > 100.0 => {
                Err(invalid_offer("discount_percent must be in (0, 100]")
                    .with_detail("discount_percent", pct))
            }
            (None, Some(price)) if price < 0 => Err(invalid_offer(
                "fixed_price must be non-negative",
            )
            .with_detail("fixed_price", price)),
            _ => Ok(()),
        }
    }

    pub fn into_offer(self, now: i64) -> CategoryOffer {
        CategoryOffer {
            category: self.category.trim().to_string(),
            discount_percent: self.discount_percent,
            fixed_price: self.fixed_price,
            start_at: self.start_at,
            end_at: self.end_at,
            label: self.label.filter(|l| !l.trim().is_empty()),
            is_flash: self.is_flash,
            updated_at: now,
        }
    }
}

fn invalid_offer(msg: &str) -> AppError {
    AppError::with_message(ErrorCode::CategoryOfferInvalid, msg)
}

/// Default banner shown when no sale configuration has been saved yet
pub const DEFAULT_BANNER_TEXT: &str = "Festival Sale is LIVE!";

/// Length of the placeholder window returned before any configuration exists
const DEFAULT_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Global sale switch (singleton record)
///
/// Master gate for every offer: when inactive or outside its window no
/// product or category offer applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GlobalSaleConfig {
    pub active: bool,
    pub banner_text: String,
    pub banner_subtext: Option<String>,
    /// Window start (Unix millis, inclusive)
    pub start_at: i64,
    /// Window end (Unix millis, inclusive)
    pub end_at: i64,
    pub updated_at: i64,
}

impl GlobalSaleConfig {
    /// Inactive placeholder returned to the storefront when nothing is stored
    pub fn inactive_default(now: i64) -> Self {
        Self {
            active: false,
            banner_text: DEFAULT_BANNER_TEXT.to_string(),
            banner_subtext: None,
            start_at: now,
            end_at: now + DEFAULT_WINDOW_MS,
            updated_at: now,
        }
    }
}

/// Replace global sale configuration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSaleConfigUpdate {
    pub active: bool,
    pub banner_text: String,
    pub banner_subtext: Option<String>,
    pub start_at: i64,
    pub end_at: i64,
}

impl GlobalSaleConfigUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.banner_text.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::SaleConfigInvalid,
                "banner_text must not be empty",
            ));
        }
        if self.start_at >= self.end_at {
            return Err(AppError::with_message(
                ErrorCode::SaleConfigInvalid,
                "start_at must be before end_at",
            ));
        }
        Ok(())
    }

    pub fn into_config(self, now: i64) -> GlobalSaleConfig {
        GlobalSaleConfig {
            active: self.active,
            banner_text: self.banner_text,
            banner_subtext: self.banner_subtext,
            start_at: self.start_at,
            end_at: self.end_at,
            updated_at: now,
        }
    }
}
