//! Promotional price resolver
//!
//! Pure and total: the same inputs always give the same price, so the
//! storefront display, the cart total and the amount charged agree.
//!
//! Evaluation order (first match wins):
//!
//! ```text
//! global switch off / outside window ──► base price, no sale
//! A  product flash offer       (offer.price)
//! B  category flash offer      (fixed_price | base − base·pct/100)
//! C  product standard offer
//! D  category standard offer
//! E  base price
//! ```
//!
//! All windows are inclusive at both ends. Callers pricing several lines of
//! one checkout must pass the same `now` to every call; [`quote_cart`] does
//! this for them.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{CategoryOffer, GlobalSaleConfig, Product};

const FLASH_LABEL: &str = "Flash Sale";
const FESTIVAL_LABEL: &str = "Festival Offer";

/// Which pricing tier produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleTier {
    ProductFlash,
    CategoryFlash,
    ProductOffer,
    CategoryOffer,
    BasePrice,
}

/// Effective price for one product at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResolution {
    pub current_price: i64,
    pub is_sale_active: bool,
    pub label: String,
    pub is_flash: bool,
    /// Countdown for flash tiers (`end_at - now`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_millis: Option<i64>,
    pub tier: SaleTier,
}

impl PriceResolution {
    fn base(product: &Product) -> Self {
        Self {
            current_price: product.price,
            is_sale_active: false,
            label: String::new(),
            is_flash: false,
            remaining_millis: None,
            tier: SaleTier::BasePrice,
        }
    }
}

#[inline]
fn in_window(start_at: i64, end_at: i64, now: i64) -> bool {
    now >= start_at && now <= end_at
}

/// Whether the global switch currently lets any offer apply
pub fn is_sale_window_open(config: Option<&GlobalSaleConfig>, now: i64) -> bool {
    config.is_some_and(|c| c.active && in_window(c.start_at, c.end_at, now))
}

/// Category offer price: `fixed_price` first, else percentage off the base,
/// rounded half-up to the integer unit.
pub fn category_offer_price(base: i64, offer: &CategoryOffer) -> i64 {
    if let Some(fixed) = offer.fixed_price {
        return fixed;
    }
    let Some(pct) = offer.discount_percent.and_then(Decimal::from_f64) else {
        return base;
    };
    let base_dec = Decimal::from(base);
    let discounted = base_dec - base_dec * pct / Decimal::ONE_HUNDRED;
    discounted
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
        .to_i64()
        .unwrap_or(base)
}

fn label_or(label: Option<&str>, fallback: &str) -> String {
    match label {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => fallback.to_string(),
    }
}

/// Resolve the effective price of `product` at `now`.
pub fn resolve_price(
    product: &Product,
    category_offers: &[CategoryOffer],
    global_config: Option<&GlobalSaleConfig>,
    now: i64,
) -> PriceResolution {
    if !is_sale_window_open(global_config, now) {
        return PriceResolution::base(product);
    }

    let product_offer = product
        .offer
        .as_ref()
        .filter(|o| in_window(o.start_at, o.end_at, now));
    let category_offer = category_offers
        .iter()
        .find(|o| o.category == product.category)
        .filter(|o| in_window(o.start_at, o.end_at, now));

    // A: product flash
    if let Some(offer) = product_offer.filter(|o| o.is_flash) {
        return PriceResolution {
            current_price: offer.price,
            is_sale_active: true,
            label: label_or(offer.label.as_deref(), FLASH_LABEL),
            is_flash: true,
            remaining_millis: Some(offer.end_at - now),
            tier: SaleTier::ProductFlash,
        };
    }

    // B: category flash
    if let Some(offer) = category_offer.filter(|o| o.is_flash) {
        return PriceResolution {
            current_price: category_offer_price(product.price, offer),
            is_sale_active: true,
            label: label_or(offer.label.as_deref(), FLASH_LABEL),
            is_flash: true,
            remaining_millis: Some(offer.end_at - now),
            tier: SaleTier::CategoryFlash,
        };
    }

    // C: product standard
    if let Some(offer) = product_offer {
        return PriceResolution {
            current_price: offer.price,
            is_sale_active: true,
            label: label_or(offer.label.as_deref(), FESTIVAL_LABEL),
            is_flash: false,
            remaining_millis: None,
            tier: SaleTier::ProductOffer,
        };
    }

    // D: category standard
    if let Some(offer) = category_offer {
        return PriceResolution {
            current_price: category_offer_price(product.price, offer),
            is_sale_active: true,
            label: label_or(offer.label.as_deref(), FESTIVAL_LABEL),
            is_flash: false,
            remaining_millis: None,
            tier: SaleTier::CategoryOffer,
        };
    }

    PriceResolution::base(product)
}

/// One priced cart line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedLine {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub line_total: i64,
    pub resolution: PriceResolution,
}

/// Priced cart, every line resolved at the same instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartQuote {
    pub lines: Vec<QuotedLine>,
    pub total: i64,
    pub priced_at: i64,
}

/// Price a whole cart with a single `now`
pub fn quote_cart<'a>(
    lines: impl IntoIterator<Item = (&'a Product, i32)>,
    category_offers: &[CategoryOffer],
    global_config: Option<&GlobalSaleConfig>,
    now: i64,
) -> CartQuote {
    let lines: Vec<QuotedLine> = lines
        .into_iter()
        .map(|(product, quantity)| {
            let resolution = resolve_price(product, category_offers, global_config, now);
            QuotedLine {
                product_id: product.id.clone(),
                quantity,
                unit_price: resolution.current_price,
                line_total: resolution.current_price * i64::from(quantity),
                resolution,
            }
        })
        .collect();
    let total = lines.iter().map(|l| l.line_total).sum();
    CartQuote {
        lines,
        total,
        priced_at: now,
    }
}
