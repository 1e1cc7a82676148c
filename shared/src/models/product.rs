//! Product Model
//!
//! Products are owned by the catalog; pricing and settlement only read them.

use serde::{Deserialize, Serialize};

/// Product-level promotional offer (festival / flash price)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOffer {
    /// Absolute sale price (integer currency unit)
    pub price: i64,
    /// Window start (Unix millis, inclusive)
    pub start_at: i64,
    /// Window end (Unix millis, inclusive)
    pub end_at: i64,
    pub label: Option<String>,
    #[serde(default)]
    pub is_flash: bool,
}

/// Product entity (pricing view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Base price (integer currency unit)
    pub price: i64,
    /// Category key, matched against `CategoryOffer::category`
    pub category: String,
    #[serde(default)]
    pub offer: Option<ProductOffer>,
}
