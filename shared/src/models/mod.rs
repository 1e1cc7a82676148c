//! Data models
//!
//! Shared between shop-server and the storefront frontend (via API).
//! Flat DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All timestamps are Unix millis (`i64`), all amounts integer currency units.

pub mod notification;
pub mod offer;
pub mod order;
pub mod product;

// Re-exports
pub use notification::*;
pub use offer::*;
pub use order::*;
pub use product::*;
